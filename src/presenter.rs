//! HTML rendering of the solver page and solve outcomes.

use crate::error::ValidationError;
use crate::input::{Mode, UploadedImage, ALLOWED_EXTENSIONS};
use base64::Engine as _;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};
use std::fmt::Write as _;

pub const PAGE_TITLE: &str = "AI Question Solver Bot";
pub const ANSWER_HEADING: &str = "AI Answer";
pub const FAILURE_MESSAGE: &str = "❌ Unable to get response from AI.";
pub const FAILURE_HINT: &str = "This may happen if billing is not enabled or quota is exhausted.";

/// Result of one solve cycle, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Answer(String),
    Warning(ValidationError),
    /// The form itself could not be read, so no solve was attempted.
    Rejected(String),
    Failure(String),
}

/// Current widget values echoed back into the form.
#[derive(Debug, Clone, Default)]
pub struct PageState {
    pub mode: Mode,
    pub question: String,
    pub preview: Option<String>,
    pub outcome: Option<Outcome>,
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const SAFE_URL_PREFIXES: &[&str] = &["http://", "https://", "mailto:"];

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    let lower = url.trim().to_ascii_lowercase();
    if SAFE_URL_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        url
    } else {
        CowStr::Borrowed("#")
    }
}

// Raw HTML from the model is shown as text; link targets are limited to safe schemes.
fn sanitize(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    }
}

/// Renders model output as markdown, the way chat answers are usually written.
pub fn render_markdown(text: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(text, options).map(sanitize);
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Data URI for showing the upload back to the user, labeled with its real type.
pub fn preview_data_uri(image: &UploadedImage) -> String {
    let mime = image.kind().map_or("image/png", |kind| kind.mime_type());
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(&image.bytes)
    )
}

pub fn present(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Answer(answer) => format!(
            "<section class=\"answer\"><h2>{}</h2><div class=\"answer-text\">{}</div></section>",
            ANSWER_HEADING,
            render_markdown(answer)
        ),
        Outcome::Warning(warning) => format!(
            "<div class=\"warning\" role=\"alert\">{}</div>",
            escape_html(&warning.to_string())
        ),
        Outcome::Rejected(reason) => format!(
            "<div class=\"warning\" role=\"alert\">{}</div>",
            escape_html(reason)
        ),
        Outcome::Failure(raw) => format!(
            "<div class=\"error\" role=\"alert\">{}</div>\
             <div class=\"info\">{}</div>\
             <pre><code>{}</code></pre>",
            FAILURE_MESSAGE,
            FAILURE_HINT,
            escape_html(raw)
        ),
    }
}

fn checked(state: &PageState, mode: Mode) -> &'static str {
    if state.mode == mode {
        " checked"
    } else {
        ""
    }
}

pub fn render_page(state: &PageState) -> String {
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="icon" href="data:image/svg+xml,<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22><text y=%22.9em%22 font-size=%2290%22>🤖</text></svg>">
<style>
body {{ font-family: sans-serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; }}
.warning {{ background: #fff8e1; border-left: 4px solid #f9a825; padding: .75rem; }}
.error {{ background: #ffebee; border-left: 4px solid #c62828; padding: .75rem; }}
.info {{ background: #e3f2fd; border-left: 4px solid #1565c0; padding: .75rem; margin-top: .5rem; }}
.preview {{ max-width: 100%; }}
#busy {{ display: none; }}
form.busy #busy {{ display: inline; }}
body:has(#mode-text:checked) .image-field, body:has(#mode-image:checked) .text-field {{ display: none; }}
</style>
</head>
<body>
<h1>{title} 🤖</h1>
<p>Ask a question or upload an image containing a question.</p>
<form method="post" action="/solve" enctype="multipart/form-data"
      onsubmit="this.classList.add('busy'); this.querySelector('button').disabled = true;">
<fieldset>
<legend>Choose input type:</legend>
<label><input type="radio" id="mode-text" name="mode" value="text"{text_checked}> Text Question</label>
<label><input type="radio" id="mode-image" name="mode" value="image"{image_checked}> Image Upload</label>
</fieldset>
<p class="text-field"><label>Enter your question <input type="text" name="question" value="{question}"></label></p>
<p class="image-field"><label>Upload an image (JPG / PNG) <input type="file" name="image" accept="{accept}"></label></p>
"#,
        title = PAGE_TITLE,
        text_checked = checked(state, Mode::Text),
        image_checked = checked(state, Mode::Image),
        question = escape_html(&state.question),
        accept = ALLOWED_EXTENSIONS
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(","),
    );

    if let (Mode::Image, Some(preview)) = (state.mode, &state.preview) {
        let _ = writeln!(
            html,
            "<figure><img class=\"preview\" src=\"{}\" alt=\"Uploaded Image\"><figcaption>Uploaded Image</figcaption></figure>",
            preview
        );
    }

    html.push_str("<button type=\"submit\">Solve</button> <span id=\"busy\">Thinking... 🤔</span>\n</form>\n");

    if let Some(outcome) = &state.outcome {
        html.push_str(&present(outcome));
        html.push('\n');
    }

    html.push_str("</body>\n</html>\n");
    html
}

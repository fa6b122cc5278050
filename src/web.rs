//! HTTP surface: one page, one form post.

use crate::app::App;
use crate::input::{self, Mode, UploadedImage};
use crate::presenter::{self, Outcome, PageState};
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tracing::{debug, warn};

pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn router(app: Arc<App>) -> Router {
    add_routes(Router::new(), &[page_routes, health_routes])
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(app)
}

fn add_routes<T>(app: Router<T>, funcs: &[fn(Router<T>) -> Router<T>]) -> Router<T> {
    let mut app = app;
    for func in funcs {
        app = func(app);
    }
    app
}

fn page_routes(app: Router<Arc<App>>) -> Router<Arc<App>> {
    app.route("/", get(index)).route("/solve", post(solve))
}

fn health_routes(app: Router<Arc<App>>) -> Router<Arc<App>> {
    app.route("/healthcheck", get(|| async { "OK" }))
}

async fn index() -> Html<String> {
    Html(presenter::render_page(&PageState::default()))
}

/// Form fields as posted; the image is `None` when no acceptable file was chosen.
#[derive(Debug, Default)]
struct SolveForm {
    mode: Mode,
    question: String,
    image: Option<UploadedImage>,
}

fn rejection_message(err: &MultipartError) -> String {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        format!(
            "The upload is too large. Please choose an image under {} MiB.",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )
    } else {
        format!("The form could not be read: {}", err.body_text())
    }
}

// Fills `form` field by field so a failure part-way keeps what was already read.
async fn read_form(mut multipart: Multipart, form: &mut SolveForm) -> Result<(), MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "mode" => form.mode = Mode::from_form_value(&field.text().await?),
            "question" => form.question = field.text().await?,
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;

                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                if !input::is_allowed_upload(&file_name) {
                    warn!("Ignoring upload with unsupported extension: {}", file_name);
                    continue;
                }
                debug!("Received upload {} ({} bytes)", file_name, bytes.len());
                form.image = Some(UploadedImage::new(bytes.to_vec(), Some(file_name)));
            }
            other => debug!("Ignoring unknown form field: {}", other),
        }
    }

    Ok(())
}

async fn solve(State(app): State<Arc<App>>, multipart: Multipart) -> (StatusCode, Html<String>) {
    let mut form = SolveForm::default();
    if let Err(err) = read_form(multipart, &mut form).await {
        warn!("Rejected form post ({}): {}", err.status(), err.body_text());
        let state = PageState {
            mode: form.mode,
            question: form.question,
            preview: None,
            outcome: Some(Outcome::Rejected(rejection_message(&err))),
        };
        return (err.status(), Html(presenter::render_page(&state)));
    }

    let preview = form
        .image
        .as_ref()
        .filter(|_| form.mode == Mode::Image)
        .map(presenter::preview_data_uri);
    let outcome = app.solve(form.mode, &form.question, form.image).await;

    let state = PageState {
        mode: form.mode,
        question: form.question,
        preview,
        outcome: Some(outcome),
    };
    (StatusCode::OK, Html(presenter::render_page(&state)))
}

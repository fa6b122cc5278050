//! User input collection and validation
//!
//! The form delivers a mode plus two loosely related fields. Validation turns
//! them into an [`InputSelection`] holding exactly one payload.

use crate::error::ValidationError;

/// File extensions the upload control accepts.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Text,
    Image,
}

impl Mode {
    /// Parses the form value; anything unrecognized falls back to text mode.
    pub fn from_form_value(value: &str) -> Self {
        match value.trim() {
            "image" => Mode::Image,
            _ => Mode::Text,
        }
    }

    pub fn as_form_value(&self) -> &'static str {
        match self {
            Mode::Text => "text",
            Mode::Image => "image",
        }
    }
}

/// Raw bytes of an uploaded image. The bytes are never decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
}

impl UploadedImage {
    pub fn new(bytes: Vec<u8>, file_name: Option<String>) -> Self {
        Self { bytes, file_name }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSelection {
    Text(String),
    Image(UploadedImage),
}

impl InputSelection {
    /// Validates the form fields for `mode` and keeps only the active payload.
    pub fn collect(
        mode: Mode,
        text: &str,
        image: Option<UploadedImage>,
    ) -> Result<Self, ValidationError> {
        validate(mode, text, image.as_ref().map(|i| i.bytes.as_slice()))?;

        match (mode, image) {
            (Mode::Text, _) => Ok(InputSelection::Text(text.to_string())),
            (Mode::Image, Some(image)) => Ok(InputSelection::Image(image)),
            (Mode::Image, None) => Err(ValidationError::MissingImage),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            InputSelection::Text(_) => Mode::Text,
            InputSelection::Image(_) => Mode::Image,
        }
    }
}

pub fn validate(mode: Mode, text: &str, image: Option<&[u8]>) -> Result<(), ValidationError> {
    match mode {
        Mode::Text if text.trim().is_empty() => Err(ValidationError::EmptyQuestion),
        Mode::Image if image.map_or(true, |bytes| bytes.is_empty()) => {
            Err(ValidationError::MissingImage)
        }
        _ => Ok(()),
    }
}

/// Encodings the upload control accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// Reads the leading magic bytes; the rest of the upload is never inspected.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0x89, b'P', b'N', b'G', ..] => Some(ImageKind::Png),
            [0xFF, 0xD8, 0xFF, ..] => Some(ImageKind::Jpeg),
            _ => None,
        }
    }

    /// Case-insensitive match of the file extension against [`ALLOWED_EXTENSIONS`].
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageKind::Png),
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
        }
    }
}

impl UploadedImage {
    /// Best guess at the real encoding: content first, then the file name.
    pub fn kind(&self) -> Option<ImageKind> {
        ImageKind::sniff(&self.bytes).or_else(|| {
            self.file_name
                .as_deref()
                .and_then(ImageKind::from_file_name)
        })
    }
}

pub fn is_allowed_upload(file_name: &str) -> bool {
    ImageKind::from_file_name(file_name).is_some()
}

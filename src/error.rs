//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

/// Reasons a solve request is rejected before any prompt is built.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a question.")]
    EmptyQuestion,

    #[error("Please upload an image.")]
    MissingImage,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0} not found. Please set it in the environment.")]
    MissingCredential(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Completion(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_message_names_variable() {
        let err = Error::MissingCredential("OPENAI_API_KEY".to_string());
        assert_eq!(
            err.to_string(),
            "OPENAI_API_KEY not found. Please set it in the environment."
        );
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let err: Error = ValidationError::MissingImage.into();
        assert_eq!(err.to_string(), "Please upload an image.");
    }

    #[test]
    fn test_completion_error_carries_raw_text() {
        let err = Error::Completion("insufficient_quota".to_string());
        assert_eq!(err.to_string(), "insufficient_quota");
    }
}

//! Runtime configuration and the startup credential check.

use crate::{Error, Result};
use secrecy::SecretString;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const MODEL_VAR: &str = "OPENAI_MODEL";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Fails with [`Error::MissingCredential`] when the key is unset or blank.
pub fn check_credential<F>(lookup: F) -> Result<SecretString>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(API_KEY_VAR) {
        Some(value) if !value.trim().is_empty() => Ok(SecretString::from(value)),
        _ => Err(Error::MissingCredential(API_KEY_VAR.to_string())),
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credential: SecretString,
    pub model: String,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credential = check_credential(&lookup)?;

        let model = lookup(MODEL_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = lookup(BASE_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            credential,
            model,
            base_url,
        })
    }
}

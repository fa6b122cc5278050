//! AI question solver - a single-page tool that explains answers to typed or
//! photographed questions
//!
//! The user picks text or image mode, the input is validated and turned into
//! a chat-completion request, and the model's explanation is rendered back
//! into the page.

pub mod ai;
pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod presenter;
pub mod prompts;
pub mod web;

pub use error::{Error, Result};

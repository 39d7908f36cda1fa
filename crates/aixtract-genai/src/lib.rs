//! Generative text service abstraction for aixtract.
//!
//! This crate provides a single seam for talking to a text generation model:
//! - [`GenerativeService`], a one-method trait taking a [`ChatRequest`]
//! - an Ollama `/api/chat` backend for native builds

mod backend;
mod error;
mod request;

pub use backend::GenerativeService;
pub use error::GenAiError;
pub use request::{ChatMessage, ChatRequest, Role};

#[cfg(feature = "ollama")]
pub use backend::ollama::{OllamaBackend, OllamaConfig};

/// Result type for generative service operations.
pub type Result<T> = std::result::Result<T, GenAiError>;

//! Generative service backends.

#[cfg(feature = "ollama")]
pub mod ollama;

use crate::{ChatRequest, Result};

/// Trait for generative text services.
///
/// Implementations perform one blocking round trip per call and return the
/// complete generated text, whether or not the service streamed it.
pub trait GenerativeService: Send + Sync {
    /// Send the request and return the full response text.
    fn invoke(&self, request: &ChatRequest) -> Result<String>;
}

impl<S: GenerativeService + ?Sized> GenerativeService for &S {
    fn invoke(&self, request: &ChatRequest) -> Result<String> {
        (**self).invoke(request)
    }
}

impl<S: GenerativeService + ?Sized> GenerativeService for Box<S> {
    fn invoke(&self, request: &ChatRequest) -> Result<String> {
        (**self).invoke(request)
    }
}

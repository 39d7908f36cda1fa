//! Structured extraction through a generative service.

mod controller;
mod json_block;
mod template;

pub use controller::{extract_structured, ExtractionController};
pub use json_block::{find_json_block, parse_json_block};
pub use template::{serialize_segment, PromptTemplate, CONTENT_VARIABLE};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

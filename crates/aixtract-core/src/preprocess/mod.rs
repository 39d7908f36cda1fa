//! Layout-aware fragment preprocessing.

pub mod element;
mod layout;

pub use element::{parse_text_element, FragmentError, TextElement};
pub use layout::{deduplicate_fragments, order_fragments, split_at_center};

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::PreprocessError;
use crate::models::config::PreprocessConfig;
use crate::models::document::RawFragment;
use crate::models::segments::{PageContent, PreprocessedDocument};

/// Result type for preprocessing operations.
pub type Result<T> = std::result::Result<T, PreprocessError>;

/// Trait for page preprocessors.
pub trait Preprocessor {
    /// Turn each page's raw fragments into segmented content.
    fn process(&self, pages: &BTreeMap<u32, Vec<RawFragment>>) -> PreprocessedDocument;
}

/// Orders, deduplicates and bisects the fragments of every page.
#[derive(Debug, Clone)]
pub struct FragmentPreprocessor {
    top_tolerance: u64,
    left_tolerance: u64,
    descending: bool,
}

impl FragmentPreprocessor {
    /// Create a preprocessor with 5-unit tolerances and top-down order.
    pub fn new() -> Self {
        Self {
            top_tolerance: 5,
            left_tolerance: 5,
            descending: false,
        }
    }

    /// Create a preprocessor from configuration.
    pub fn from_config(config: &PreprocessConfig) -> Self {
        Self {
            top_tolerance: config.top_tolerance,
            left_tolerance: config.left_tolerance,
            descending: config.descending,
        }
    }

    /// Set duplicate tolerances.
    pub fn with_tolerances(mut self, top: u64, left: u64) -> Self {
        self.top_tolerance = top;
        self.left_tolerance = left;
        self
    }

    /// Order bottom to top.
    pub fn with_descending(mut self, descending: bool) -> Self {
        self.descending = descending;
        self
    }

    pub fn order(&self, fragments: &[RawFragment]) -> Vec<RawFragment> {
        order_fragments(fragments, self.descending)
    }

    pub fn deduplicate(&self, fragments: &[RawFragment]) -> Vec<RawFragment> {
        deduplicate_fragments(fragments, self.top_tolerance, self.left_tolerance)
    }

    pub fn split(&self, fragments: &[RawFragment]) -> PageContent {
        let (upper, lower) = split_at_center(fragments);
        PageContent::new(upper, lower)
    }

    /// Order, deduplicate and split one page.
    pub fn process_page(&self, fragments: &[RawFragment]) -> PageContent {
        let ordered = self.order(fragments);
        let unique = self.deduplicate(&ordered);
        let content = self.split(&unique);

        debug!(
            "{} fragments -> {} ordered -> {} unique -> {}/{} split",
            fragments.len(),
            ordered.len(),
            unique.len(),
            content.upper.len(),
            content.lower.len()
        );

        content
    }

    /// Process an untyped JSON object of `page -> [fragment, ...]`.
    pub fn process_json(&self, data: &Value) -> Result<PreprocessedDocument> {
        let Some(object) = data.as_object() else {
            return Err(PreprocessError::Validation {
                page: "<root>".to_string(),
            });
        };

        let mut pages = BTreeMap::new();
        for (page, value) in object {
            let fragments = value
                .as_array()
                .and_then(|items| {
                    items
                        .iter()
                        .map(|item| item.as_str().map(RawFragment::from))
                        .collect::<Option<Vec<_>>>()
                })
                .ok_or_else(|| PreprocessError::Validation { page: page.clone() })?;

            let number: u32 = page
                .trim()
                .parse()
                .map_err(|_| PreprocessError::InvalidPage { page: page.clone() })?;

            pages.insert(number, fragments);
        }

        Ok(self.process(&pages))
    }
}

impl Default for FragmentPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor for FragmentPreprocessor {
    fn process(&self, pages: &BTreeMap<u32, Vec<RawFragment>>) -> PreprocessedDocument {
        let pages = pages
            .iter()
            .map(|(page, fragments)| {
                let content = self.process_page(fragments);
                info!(
                    "Page {}: {} upper / {} lower fragments",
                    page,
                    content.upper.len(),
                    content.lower.len()
                );
                (*page, content)
            })
            .collect();

        PreprocessedDocument { pages }
    }
}

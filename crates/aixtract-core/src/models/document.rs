//! Parsed pdf2xml documents: pages, page sizes and raw text fragments.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical extent of a page as reported by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageSize {
    pub top: f64,
    pub left: f64,
    pub height: f64,
    pub width: f64,
}

/// One serialized `<text>` element, kept verbatim as the converter wrote it.
///
/// The element carries its own `top`/`left` attributes and emphasis markup, so
/// downstream stages re-parse it instead of relying on a separate schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawFragment(String);

impl RawFragment {
    pub fn new(xml: impl Into<String>) -> Self {
        Self(xml.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RawFragment {
    fn from(xml: &str) -> Self {
        Self::new(xml)
    }
}

impl From<String> for RawFragment {
    fn from(xml: String) -> Self {
        Self(xml)
    }
}

impl fmt::Display for RawFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content of a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    /// Page extent.
    pub size: PageSize,
    /// Text fragments in document order.
    pub fragments: Vec<RawFragment>,
}

/// A pdf2xml document keyed by page number.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub pages: BTreeMap<u32, PageData>,
}

impl ParsedDocument {
    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Fragments of every page, without page sizes.
    pub fn fragment_map(&self) -> BTreeMap<u32, Vec<RawFragment>> {
        self.pages
            .iter()
            .map(|(page, data)| (*page, data.fragments.clone()))
            .collect()
    }
}

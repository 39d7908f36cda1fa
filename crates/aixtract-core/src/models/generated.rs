//! Structured records produced by the generative service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::segments::Segment;

/// Nested key/value data extracted for one segment.
///
/// Always a parsed JSON object, with key order preserved as the model emitted it.
pub type StructuredRecord = Map<String, Value>;

/// Records for one page, keyed by segment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageGenerate {
    pub segments: BTreeMap<Segment, StructuredRecord>,
}

impl PageGenerate {
    pub fn insert(&mut self, segment: Segment, record: StructuredRecord) {
        self.segments.insert(segment, record);
    }

    pub fn get(&self, segment: Segment) -> Option<&StructuredRecord> {
        self.segments.get(&segment)
    }
}

/// Extraction output for a whole document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedDocument {
    pub pages: BTreeMap<u32, PageGenerate>,
}

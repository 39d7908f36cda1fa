//! Per-page and aggregate similarity scores.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Key under which the aggregate score is reported.
pub const MEAN_KEY: &str = "mean";

/// Similarity scores in `[0.0, 1.0]` per page, plus their mean.
///
/// A page score is `None` when the page has no ground-truth text to align.
/// Serializes as `{"1": 0.82, "2": null, "mean": 0.82}`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scores {
    pub pages: BTreeMap<u32, Option<f64>>,
    pub mean: Option<f64>,
}

impl Scores {
    /// Build scores from per-page values, computing the mean last.
    pub fn from_pages(pages: BTreeMap<u32, Option<f64>>) -> Self {
        let valid: Vec<f64> = pages
            .values()
            .filter_map(|score| *score)
            .filter(|score| score.is_finite())
            .collect();

        let mean = if valid.is_empty() {
            None
        } else {
            Some(valid.iter().sum::<f64>() / valid.len() as f64)
        };

        Self { pages, mean }
    }

    pub fn page(&self, page: u32) -> Option<f64> {
        self.pages.get(&page).copied().flatten()
    }
}

impl Serialize for Scores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pages.len() + 1))?;
        for (page, score) in &self.pages {
            map.serialize_entry(&page.to_string(), score)?;
        }
        map.serialize_entry(MEAN_KEY, &self.mean)?;
        map.end()
    }
}

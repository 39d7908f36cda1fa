//! Alignment scoring of generated records against ground-truth fragments.

mod flatten;
mod merge;
mod similarity;

pub use flatten::{flatten_generated, flatten_ground_truth};
pub use merge::{merge_into, merge_structured};
pub use similarity::{metric_by_name, SimilarityMetric, StrSimilarity};

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::ScoreError;
use crate::models::document::RawFragment;
use crate::models::generated::{GeneratedDocument, PageGenerate, StructuredRecord};
use crate::models::score::Scores;
use crate::models::segments::Segment;

/// Result type for scoring operations.
pub type Result<T> = std::result::Result<T, ScoreError>;

/// Scores generated pages against the fragments they were extracted from.
pub struct AlignmentScorer<M: SimilarityMetric = StrSimilarity> {
    metric: M,
}

impl AlignmentScorer<StrSimilarity> {
    pub fn new() -> Self {
        Self {
            metric: StrSimilarity,
        }
    }
}

impl Default for AlignmentScorer<StrSimilarity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: SimilarityMetric> AlignmentScorer<M> {
    /// Create a scorer using a custom metric.
    pub fn with_metric(metric: M) -> Self {
        Self { metric }
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Merge a page's segment records in segment order.
    pub fn merge_page(page: &PageGenerate) -> StructuredRecord {
        Segment::ALL
            .into_iter()
            .filter_map(|segment| page.get(segment))
            .fold(StructuredRecord::new(), |acc, record| {
                merge_structured(acc, record.clone())
            })
    }

    /// Score one page. `None` when the ground truth holds no text.
    pub fn score_page(&self, fragments: &[RawFragment], record: &StructuredRecord) -> Result<Option<f64>> {
        let ground_truth = flatten_ground_truth(fragments)?;
        if ground_truth.is_empty() {
            return Ok(None);
        }

        let mut generated = flatten_generated(&Value::Object(record.clone()));
        debug!(
            "Aligning {} ground-truth strings against {} generated strings",
            ground_truth.len(),
            generated.len()
        );

        Ok(Some(self.metric.score(&ground_truth, &mut generated)))
    }

    /// Score every ground-truth page and compute the mean.
    ///
    /// Each ground-truth page needs a generated page holding both segments.
    pub fn process(
        &self,
        ground_truth: &BTreeMap<u32, Vec<RawFragment>>,
        generated: &GeneratedDocument,
    ) -> Result<Scores> {
        let mut pages = BTreeMap::new();

        for (page, fragments) in ground_truth {
            let page_generate = generated
                .pages
                .get(page)
                .ok_or(ScoreError::MissingPage { page: *page })?;

            if page_generate.segments.len() != Segment::ALL.len() {
                return Err(ScoreError::UnexpectedSegments {
                    page: *page,
                    found: page_generate.segments.len(),
                });
            }

            let merged = Self::merge_page(page_generate);
            let score = self.score_page(fragments, &merged)?;

            match score {
                Some(value) => info!("Page {} {}: {:.2}", page, self.metric.name(), value),
                None => info!("Page {} has no ground-truth text, skipping", page),
            }
            pages.insert(*page, score);
        }

        Ok(Scores::from_pages(pages))
    }
}

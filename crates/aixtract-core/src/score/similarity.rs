//! Similarity metrics over flattened string lists.

use similar::TextDiff;
use tracing::trace;

/// Trait for list-to-list similarity metrics.
pub trait SimilarityMetric {
    /// Name used to select the metric.
    fn name(&self) -> &'static str;

    /// Score how well `generated` covers `ground_truth`, in `[0.0, 1.0]`.
    ///
    /// `generated` may be consumed in place so one entry cannot satisfy
    /// several ground-truth strings.
    fn score(&self, ground_truth: &[String], generated: &mut Vec<String>) -> f64;
}

impl<M: SimilarityMetric + ?Sized> SimilarityMetric for Box<M> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn score(&self, ground_truth: &[String], generated: &mut Vec<String>) -> f64 {
        (**self).score(ground_truth, generated)
    }
}

/// Greedy substring-consuming string similarity.
///
/// Each ground-truth string takes 1.0 from the first generated entry that
/// contains it, removing the matched text from that entry. Otherwise it takes
/// the best sequence ratio over all entries. The result is the mean,
/// rounded to two decimals.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrSimilarity;

impl StrSimilarity {
    pub const NAME: &'static str = "str_similarity";

    /// Best score of one ground-truth string, consuming a matched substring.
    fn best_match(&self, target: &str, generated: &mut [String]) -> f64 {
        let mut best = 0.0_f64;

        for entry in generated.iter_mut() {
            if entry.contains(target) {
                trace!("{:?} found in {:?}", target, entry);
                *entry = entry.replacen(target, "", 1).trim().to_string();
                return 1.0;
            }
            best = best.max(round2(sequence_ratio(target, entry)));
        }

        trace!("{:?} best approximate match {}", target, best);
        best
    }
}

impl SimilarityMetric for StrSimilarity {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn score(&self, ground_truth: &[String], generated: &mut Vec<String>) -> f64 {
        if ground_truth.is_empty() {
            return 0.0;
        }

        let total: f64 = ground_truth
            .iter()
            .map(|target| self.best_match(target, generated))
            .sum();

        round2(total / ground_truth.len() as f64)
    }
}

/// Matching characters over total length, `2 * M / T`.
fn sequence_ratio(a: &str, b: &str) -> f64 {
    f64::from(TextDiff::from_chars(a, b).ratio())
}

/// Look up a metric by name.
pub fn metric_by_name(name: &str) -> Option<Box<dyn SimilarityMetric>> {
    match name {
        StrSimilarity::NAME => Some(Box::new(StrSimilarity)),
        _ => None,
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_substring_matches_score_one() {
        let gt = strings(&["Taiwan", "USB 3.0"]);
        let mut generated = strings(&["Made in Taiwan factory", "USB 3.0 Rev 1.0"]);

        assert_eq!(StrSimilarity.score(&gt, &mut generated), 1.0);
        assert_eq!(generated, strings(&["Made in  factory", "Rev 1.0"]));
    }

    #[test]
    fn test_matched_text_is_consumed() {
        let gt = strings(&["USB", "USB"]);
        let mut generated = strings(&["USB"]);

        assert_eq!(StrSimilarity.score(&gt, &mut generated), 0.5);
        assert_eq!(generated, strings(&[""]));
    }

    #[test]
    fn test_approximate_match() {
        let gt = strings(&["abcd"]);
        let mut generated = strings(&["xyz", "abce"]);

        assert_eq!(StrSimilarity.score(&gt, &mut generated), 0.75);
    }

    #[test]
    fn test_partial_overlap_counts_matching_characters() {
        let gt = strings(&["Operation"]);
        let mut generated = strings(&["Operating temperature"]);
        assert_eq!(StrSimilarity.score(&gt, &mut generated), 0.53);

        let gt = strings(&["USB 3.0 Box header (CN1)"]);
        let mut generated = strings(&["USB 3.0 Box header"]);
        assert_eq!(StrSimilarity.score(&gt, &mut generated), 0.86);
    }

    #[test]
    fn test_empty_generated_scores_zero() {
        let gt = strings(&["Taiwan"]);
        assert_eq!(StrSimilarity.score(&gt, &mut Vec::new()), 0.0);
    }

    #[test]
    fn test_score_bounds() {
        let gt = strings(&["Headquarters (Taiwan)", "www.innodisk.com", "EMPU-3401", "x"]);
        let cases = [
            strings(&[]),
            strings(&["completely unrelated"]),
            strings(&["Headquarters", "innodisk", "EMPU"]),
            gt.clone(),
        ];

        for case in cases {
            let mut generated = case;
            let score = StrSimilarity.score(&gt, &mut generated);
            assert!((0.0..=1.0).contains(&score), "score {score} out of range");
        }

        let mut identical = gt.clone();
        assert_eq!(StrSimilarity.score(&gt, &mut identical), 1.0);
    }

    #[test]
    fn test_metric_by_name() {
        assert_eq!(metric_by_name("str_similarity").map(|m| m.name()), Some("str_similarity"));
        assert!(metric_by_name("bleu").is_none());
    }
}

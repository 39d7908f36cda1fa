//! Vertical ordering, spatial deduplication and emphasis-aware page splitting.

use tracing::debug;

use super::element::{parse_text_element, TextElement};
use crate::models::document::RawFragment;

/// Parse fragments, keeping only well-formed `<text>` elements.
fn parsed(fragments: &[RawFragment]) -> Vec<(TextElement, &RawFragment)> {
    fragments
        .iter()
        .filter_map(|fragment| match parse_text_element(fragment.as_str()) {
            Ok(el) => Some((el, fragment)),
            Err(e) => {
                debug!("Dropping fragment {:?}: {:?}", fragment.as_str(), e);
                None
            }
        })
        .collect()
}

/// Sort fragments by their `top` offset.
///
/// The sort is stable, so fragments on the same line keep their input order.
/// Fragments that are not well-formed text elements are dropped.
pub fn order_fragments(fragments: &[RawFragment], descending: bool) -> Vec<RawFragment> {
    let mut items = parsed(fragments);

    if descending {
        items.sort_by(|a, b| b.0.top.cmp(&a.0.top));
    } else {
        items.sort_by_key(|(el, _)| el.top);
    }

    items.into_iter().map(|(_, fragment)| fragment.clone()).collect()
}

/// Remove fragments repeating an earlier fragment's text at nearly the same spot.
///
/// A fragment is a duplicate when its trimmed text equals that of any fragment
/// already kept and both offsets lie within the tolerances. The first
/// occurrence wins.
pub fn deduplicate_fragments(
    fragments: &[RawFragment],
    top_tolerance: u64,
    left_tolerance: u64,
) -> Vec<RawFragment> {
    let mut seen: Vec<(String, i64, i64)> = Vec::new();
    let mut unique = Vec::new();

    for (el, fragment) in parsed(fragments) {
        let content = el.content().trim().to_string();

        let duplicate = seen.iter().any(|(kept, top, left)| {
            *kept == content
                && el.top.abs_diff(*top) <= top_tolerance
                && el.left.abs_diff(*left) <= left_tolerance
        });

        if duplicate {
            debug!("Dropping duplicate fragment at ({}, {}): {}", el.top, el.left, content);
            continue;
        }

        seen.push((content, el.top, el.left));
        unique.push(fragment.clone());
    }

    unique
}

/// Split ordered fragments into an upper and a lower segment.
///
/// The split line starts from the fragment closest to half of the last
/// fragment's offset and moves to the nearest change of emphasis: back to the
/// last plain fragment when the center is emphasized, forward to the next
/// emphasized fragment otherwise. Fragments at or above the line go to the
/// upper segment.
pub fn split_at_center(fragments: &[RawFragment]) -> (Vec<RawFragment>, Vec<RawFragment>) {
    let items = parsed(fragments);

    let Some((last, _)) = items.last() else {
        return (Vec::new(), Vec::new());
    };

    let center_y = last.top.div_euclid(2);

    let center_idx = items
        .iter()
        .enumerate()
        .min_by_key(|(_, (el, _))| el.top.abs_diff(center_y))
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    let closest = &items[center_idx].0;

    let split_top = if closest.emphasized {
        items[..center_idx]
            .iter()
            .rev()
            .find(|(el, _)| !el.emphasized)
            .map(|(el, _)| el.top)
            .unwrap_or(closest.top)
    } else {
        items[center_idx + 1..]
            .iter()
            .find(|(el, _)| el.emphasized)
            .map(|(el, _)| el.top)
            .unwrap_or(closest.top)
    };

    debug!(
        "Splitting {} fragments at top={} (center {}, closest {})",
        items.len(),
        split_top,
        center_y,
        closest.top
    );

    let (upper, lower): (Vec<_>, Vec<_>) = items
        .into_iter()
        .partition(|(el, _)| el.top <= split_top);

    (
        upper.into_iter().map(|(_, f)| f.clone()).collect(),
        lower.into_iter().map(|(_, f)| f.clone()).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(top: i64, left: i64, content: &str) -> RawFragment {
        RawFragment::new(format!(
            r#"<text top="{}" left="{}" width="10" height="13" font="2">{}</text>"#,
            top, left, content
        ))
    }

    fn bold(top: i64, left: i64, content: &str) -> RawFragment {
        RawFragment::new(format!(
            r#"<text top="{}" left="{}" width="10" height="13" font="1"><b>{}</b></text>"#,
            top, left, content
        ))
    }

    fn tops(fragments: &[RawFragment]) -> Vec<i64> {
        fragments
            .iter()
            .map(|f| parse_text_element(f.as_str()).unwrap().top)
            .collect()
    }

    #[test]
    fn test_order_ascending_and_stable() {
        let input = vec![text(30, 0, "c"), text(10, 0, "a"), text(30, 5, "d"), text(20, 0, "b")];
        let ordered = order_fragments(&input, false);

        assert_eq!(ordered, vec![input[1].clone(), input[3].clone(), input[0].clone(), input[2].clone()]);
    }

    #[test]
    fn test_order_descending_and_stable() {
        let input = vec![text(10, 0, "a"), text(30, 0, "c"), text(30, 5, "d")];
        let ordered = order_fragments(&input, true);

        assert_eq!(ordered, vec![input[1].clone(), input[2].clone(), input[0].clone()]);
    }

    #[test]
    fn test_order_drops_malformed_and_defaults_top() {
        let input = vec![
            text(10, 0, "a"),
            RawFragment::new("<text top=\"5\">broken"),
            RawFragment::new("<text>no offsets</text>"),
            RawFragment::new("<image top=\"1\"/>"),
        ];
        let ordered = order_fragments(&input, false);

        assert_eq!(ordered, vec![input[2].clone(), input[0].clone()]);
    }

    #[test]
    fn test_deduplicate_within_tolerance() {
        let input = vec![
            text(100, 50, "Taiwan"),
            text(103, 54, "Taiwan"),
            text(106, 50, "Taiwan"),
            text(100, 50, "Japan"),
        ];
        let unique = deduplicate_fragments(&input, 5, 5);

        // 106 is 6 away from the kept 100, so it survives.
        assert_eq!(unique, vec![input[0].clone(), input[2].clone(), input[3].clone()]);
    }

    #[test]
    fn test_deduplicate_extreme_offsets() {
        let input = vec![
            text(i64::MIN, i64::MAX, "a"),
            text(i64::MAX, i64::MIN, "a"),
            text(i64::MAX, i64::MIN, "a"),
        ];
        let unique = deduplicate_fragments(&input, u64::MAX, 5);

        assert_eq!(unique, vec![input[0].clone(), input[1].clone()]);
    }

    #[test]
    fn test_deduplicate_compares_against_all_kept() {
        let input = vec![
            text(100, 50, "Header"),
            text(300, 50, "Other"),
            text(102, 49, "Header"),
        ];
        let unique = deduplicate_fragments(&input, 5, 5);

        assert_eq!(unique, vec![input[0].clone(), input[1].clone()]);
    }

    #[test]
    fn test_deduplicate_ignores_surrounding_whitespace_and_markup() {
        let input = vec![bold(10, 10, "www.innodisk.com"), text(12, 12, " www.innodisk.com ")];
        let unique = deduplicate_fragments(&input, 5, 5);

        assert_eq!(unique, vec![input[0].clone()]);
    }

    #[test]
    fn test_deduplicate_is_idempotent() {
        let input = vec![
            text(10, 10, "a"),
            text(12, 8, "a"),
            text(14, 14, "a"),
            text(40, 10, "b"),
            text(44, 10, "b"),
            text(49, 10, "b"),
        ];
        let once = deduplicate_fragments(&input, 5, 5);
        let twice = deduplicate_fragments(&once, 5, 5);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_split_moves_forward_to_emphasis() {
        let input = vec![
            text(10, 0, "a"),
            text(20, 0, "b"),
            bold(30, 0, "Header"),
            text(40, 0, "c"),
            text(50, 0, "d"),
        ];
        let (upper, lower) = split_at_center(&input);

        assert_eq!(tops(&upper), vec![10, 20, 30]);
        assert_eq!(tops(&lower), vec![40, 50]);
    }

    #[test]
    fn test_split_moves_back_from_emphasis() {
        let input = vec![
            text(10, 0, "a"),
            text(20, 0, "b"),
            bold(48, 0, "Header"),
            bold(52, 0, "Sub header"),
            text(70, 0, "c"),
            text(100, 0, "d"),
        ];
        let (upper, lower) = split_at_center(&input);

        assert_eq!(tops(&upper), vec![10, 20]);
        assert_eq!(tops(&lower), vec![48, 52, 70, 100]);
    }

    #[test]
    fn test_split_without_emphasis_uses_closest() {
        let input = vec![text(10, 0, "a"), text(24, 0, "b"), text(60, 0, "c")];
        let (upper, lower) = split_at_center(&input);

        assert_eq!(tops(&upper), vec![10, 24]);
        assert_eq!(tops(&lower), vec![60]);
    }

    #[test]
    fn test_split_all_emphasized_uses_closest() {
        let input = vec![bold(10, 0, "a"), bold(20, 0, "b"), bold(40, 0, "c")];
        let (upper, lower) = split_at_center(&input);

        assert_eq!(tops(&upper), vec![10, 20]);
        assert_eq!(tops(&lower), vec![40]);
    }

    #[test]
    fn test_split_extreme_offsets() {
        let input = vec![text(i64::MIN, 0, "a"), text(i64::MAX, 0, "b")];
        let (upper, lower) = split_at_center(&input);

        assert_eq!(tops(&upper), vec![i64::MIN, i64::MAX]);
        assert!(lower.is_empty());

        let input = vec![text(i64::MAX, 0, "a"), text(i64::MIN, 0, "b")];
        let (upper, lower) = split_at_center(&input);

        assert_eq!(tops(&upper), vec![i64::MIN]);
        assert_eq!(tops(&lower), vec![i64::MAX]);
    }

    #[test]
    fn test_split_empty() {
        let (upper, lower) = split_at_center(&[]);
        assert!(upper.is_empty());
        assert!(lower.is_empty());
    }

    #[test]
    fn test_split_partitions_input() {
        let input = vec![
            text(5, 0, "a"),
            bold(100, 0, "h1"),
            text(240, 0, "b"),
            text(260, 0, "c"),
            bold(300, 0, "h2"),
            text(500, 0, "d"),
        ];
        let (upper, lower) = split_at_center(&input);

        assert_eq!(upper.len() + lower.len(), input.len());
        assert!(upper.iter().all(|f| !lower.contains(f)));
        assert!(input.iter().all(|f| upper.contains(f) || lower.contains(f)));
        assert!(tops(&upper).windows(2).all(|w| w[0] <= w[1]));
        assert!(tops(&lower).windows(2).all(|w| w[0] <= w[1]));
    }
}

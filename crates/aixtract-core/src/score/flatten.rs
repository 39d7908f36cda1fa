//! Flattening ground truth and generated records into comparable strings.

use serde_json::Value;

use crate::error::ScoreError;
use crate::models::document::RawFragment;
use crate::preprocess::element::{parse_text_element, FragmentError};

/// Collect the non-empty, trimmed text pieces of every fragment, longest first.
///
/// Nested markup contributes its own pieces. Equal-length pieces keep their
/// document order. Fragments whose root is not `<text>` contribute nothing;
/// fragments that are not well-formed are an error.
pub fn flatten_ground_truth(fragments: &[RawFragment]) -> Result<Vec<String>, ScoreError> {
    let mut pieces = Vec::new();

    for fragment in fragments {
        let element = match parse_text_element(fragment.as_str()) {
            Ok(el) => el,
            Err(FragmentError::NotText(_)) => continue,
            Err(FragmentError::Malformed(reason)) => {
                return Err(ScoreError::MalformedFragment(format!(
                    "{}: {}",
                    reason,
                    fragment.as_str()
                )))
            }
        };

        pieces.extend(
            element
                .texts
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        );
    }

    pieces.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    Ok(pieces)
}

/// Walk a generated value, emitting keys and values in traversal order.
///
/// Objects emit each key followed by its flattened value. Arrays emit each
/// element's string form without descending into it. Empty strings are
/// skipped; everything else is trimmed.
pub fn flatten_generated(value: &Value) -> Vec<String> {
    let mut out = Vec::new();
    walk(value, &mut out);
    out
}

fn walk(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map {
                out.push(key.trim().to_string());
                walk(inner, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                push_scalar(item, out);
            }
        }
        scalar => push_scalar(scalar, out),
    }
}

fn push_scalar(value: &Value, out: &mut Vec<String>) {
    let text = stringify(value);
    if !text.is_empty() {
        out.push(text.trim().to_string());
    }
}

/// Strings as-is, anything else as compact JSON.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_flatten_ground_truth_sorts_longest_first() {
        let fragments = vec![
            RawFragment::from("<text top=\"1\">  Taiwan </text>"),
            RawFragment::from("<text top=\"2\"><b>Features</b> USB 3.0</text>"),
            RawFragment::from("<text top=\"3\">   </text>"),
            RawFragment::from("<text top=\"4\">abcdef</text>"),
        ];

        assert_eq!(
            flatten_ground_truth(&fragments).unwrap(),
            vec!["Features", "USB 3.0", "Taiwan", "abcdef"]
        );
    }

    #[test]
    fn test_flatten_ground_truth_rejects_malformed() {
        let fragments = vec![RawFragment::from("<text top=\"1\">open")];
        assert!(matches!(
            flatten_ground_truth(&fragments),
            Err(ScoreError::MalformedFragment(_))
        ));
    }

    #[test]
    fn test_flatten_ground_truth_skips_other_elements() {
        let fragments = vec![
            RawFragment::from("<image top=\"1\" src=\"a.png\"/>"),
            RawFragment::from("<text top=\"2\">kept</text>"),
        ];
        assert_eq!(flatten_ground_truth(&fragments).unwrap(), vec!["kept"]);
    }

    #[test]
    fn test_flatten_generated_traversal_order() {
        let value = json!({
            "Product": " EMPU-3401 ",
            "Features": ["4 x USB 3.0", "", {"nested": 1}],
            "Specs": {"Ports": 4, "Hot plug": true, "Notes": null}
        });

        assert_eq!(
            flatten_generated(&value),
            vec![
                "Product",
                "EMPU-3401",
                "Features",
                "4 x USB 3.0",
                "{\"nested\":1}",
                "Specs",
                "Ports",
                "4",
                "Hot plug",
                "true",
                "Notes",
                "null",
            ]
        );
    }

    #[test]
    fn test_flatten_generated_keeps_whitespace_only_as_empty() {
        assert_eq!(flatten_generated(&json!({"k": "  "})), vec!["k", ""]);
        assert_eq!(flatten_generated(&json!({"k": ""})), vec!["k"]);
    }
}

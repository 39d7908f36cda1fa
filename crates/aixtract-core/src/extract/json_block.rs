//! Recovering a JSON object from free-form model output.

use crate::models::generated::StructuredRecord;

/// Slice from the first `{` to the last `}`.
///
/// This is a greedy capture, not a balanced-brace scan: text between two
/// separate objects is included and makes the block unparseable.
pub fn find_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parse the brace-delimited block of `text` as a JSON object.
pub fn parse_json_block(text: &str) -> Result<StructuredRecord, String> {
    let block = find_json_block(text).ok_or_else(|| "no JSON object found".to_string())?;
    serde_json::from_str(block).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_find_json_block() {
        assert_eq!(find_json_block("noise {\"a\": 1} trailing"), Some("{\"a\": 1}"));
        assert_eq!(find_json_block("```json\n{\"a\": {\"b\": 2}}\n```"), Some("{\"a\": {\"b\": 2}}"));
        assert_eq!(find_json_block("no braces"), None);
        assert_eq!(find_json_block("} backwards {"), None);
    }

    #[test]
    fn test_parse_json_block() {
        let record = parse_json_block("Here you go:\n{\"Features\": [\"USB 3.0\"]}\nDone.").unwrap();
        assert_eq!(serde_json::Value::Object(record), json!({"Features": ["USB 3.0"]}));
    }

    #[test]
    fn test_two_objects_are_not_split() {
        assert!(parse_json_block("{\"a\": 1} and {\"b\": 2}").is_err());
    }

    #[test]
    fn test_malformed_block() {
        assert!(parse_json_block("{\"a\": 1,}").is_err());
        assert!(parse_json_block("").is_err());
    }
}

//! Deep merge of structured records.

use serde_json::Value;

use crate::models::generated::StructuredRecord;

/// Merge `b` into `a`.
///
/// Keys holding objects on both sides are merged recursively; otherwise the
/// value from `b` replaces the one from `a`. Keys keep their first-seen order.
pub fn merge_structured(mut a: StructuredRecord, b: StructuredRecord) -> StructuredRecord {
    merge_into(&mut a, b);
    a
}

/// In-place form of [`merge_structured`].
pub fn merge_into(target: &mut StructuredRecord, source: StructuredRecord) {
    for (key, incoming) in source {
        match (target.get_mut(&key), incoming) {
            (Some(Value::Object(existing)), Value::Object(inner)) => merge_into(existing, inner),
            (Some(slot), value) => *slot = value,
            (None, value) => {
                target.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> StructuredRecord {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_nested_objects_merge() {
        let merged = merge_structured(record(json!({"a": {"x": 1}})), record(json!({"a": {"y": 2}})));
        assert_eq!(Value::Object(merged), json!({"a": {"x": 1, "y": 2}}));
    }

    #[test]
    fn test_scalar_conflict_takes_second() {
        let merged = merge_structured(record(json!({"a": 1})), record(json!({"a": 2})));
        assert_eq!(Value::Object(merged), json!({"a": 2}));
    }

    #[test]
    fn test_mixed_kinds_take_second() {
        let merged = merge_structured(
            record(json!({"a": {"x": 1}, "b": [1], "c": "keep"})),
            record(json!({"a": "flat", "b": {"y": 2}, "d": null})),
        );
        assert_eq!(
            Value::Object(merged),
            json!({"a": "flat", "b": {"y": 2}, "c": "keep", "d": null})
        );
    }

    #[test]
    fn test_key_order_is_first_seen() {
        let merged = merge_structured(record(json!({"z": 1, "a": 2})), record(json!({"m": 3, "z": 4})));
        let keys: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }
}

//! Opaque record representation.
//!
//! Records are provider documents with caller-defined fields. The client never
//! interprets their contents beyond the identity field.

use serde_json::Value;

/// The identity field every addressable record carries.
pub const OBJECT_ID_FIELD: &str = "objectID";

/// An opaque record: a mapping of field name to JSON value.
///
/// The provider assigns no schema; only the `objectID` field has meaning to
/// the client, as the record's identity.
pub type Record = serde_json::Map<String, Value>;

/// Read a record's identity field, if present and non-empty.
///
/// String identities are returned as-is; numeric identities are rendered to
/// their decimal form, matching how the provider addresses them in paths.
pub fn object_id(record: &Record) -> Option<String> {
    match record.get(OBJECT_ID_FIELD) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Check whether a record carries a usable identity.
pub fn has_object_id(record: &Record) -> bool {
    matches!(
        record.get(OBJECT_ID_FIELD),
        Some(Value::String(s)) if !s.is_empty()
    ) || matches!(record.get(OBJECT_ID_FIELD), Some(Value::Number(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_object_id_string() {
        let rec = record(json!({"objectID": "abc", "name": "x"}));
        assert_eq!(object_id(&rec), Some("abc".to_string()));
        assert!(has_object_id(&rec));
    }

    #[test]
    fn test_object_id_numeric() {
        let rec = record(json!({"objectID": 42}));
        assert_eq!(object_id(&rec), Some("42".to_string()));
        assert!(has_object_id(&rec));
    }

    #[test]
    fn test_object_id_missing() {
        let rec = record(json!({"name": "x"}));
        assert_eq!(object_id(&rec), None);
        assert!(!has_object_id(&rec));
    }

    #[test]
    fn test_object_id_empty_string() {
        let rec = record(json!({"objectID": ""}));
        assert_eq!(object_id(&rec), None);
        assert!(!has_object_id(&rec));
    }

    #[test]
    fn test_object_id_wrong_type() {
        let rec = record(json!({"objectID": null}));
        assert!(!has_object_id(&rec));

        let rec = record(json!({"objectID": ["a"]}));
        assert!(!has_object_id(&rec));
    }
}

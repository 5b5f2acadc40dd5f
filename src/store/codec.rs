//! JSON document codec for the links file.
//!
//! The file is a flat object keyed by external id:
//!
//! ```text
//! {
//!   "<external id>": "<uuid>",
//!   "<external id>": ["<uuid>", "<uuid>"]
//! }
//! ```
//!
//! A single link is written as a bare string and several as an array. Both
//! shapes are accepted on read whatever their length. Entries written with
//! the key and values swapped (`"<uuid>": "<external id>"`) are recovered.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::StoreError;

/// One document value: a bare string or a list of strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LinkValue {
    One(String),
    Many(Vec<String>),
}

impl LinkValue {
    /// Non-empty strings carried by the value.
    fn into_strings(self) -> Vec<String> {
        let values = match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        };
        values.into_iter().filter(|v| !v.is_empty()).collect()
    }
}

/// Result of decoding a links document.
#[derive(Debug, Default)]
pub(crate) struct Decoded {
    /// `(external id, local id)` pairs in document order.
    pub(crate) pairs: Vec<(String, Uuid)>,
    /// Keys that were only readable with the orientation swapped.
    pub(crate) reversed: usize,
    /// Entries that could not be read either way.
    pub(crate) skipped: Vec<StoreError>,
    /// The document was a bare primitive and was read as `{}`.
    pub(crate) primitive_document: bool,
}

/// Decodes a links document.
///
/// Blank content reads as an empty document, as does a bare primitive
/// (`"x"`, `42`, `null`). Corrupt entries are collected in
/// [`Decoded::skipped`] and never abort the decode.
///
/// # Errors
///
/// Returns the parser diagnostic when the content is not JSON, or is a JSON
/// array.
pub(crate) fn decode(contents: &str) -> Result<Decoded, String> {
    let mut decoded = Decoded::default();
    if contents.trim().is_empty() {
        return Ok(decoded);
    }

    let document: Value = serde_json::from_str(contents).map_err(|e| e.to_string())?;
    let entries = match document {
        Value::Object(entries) => entries,
        Value::Array(_) => return Err("expected a JSON object but found an array".to_string()),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            decoded.primitive_document = true;
            Map::new()
        }
    };

    for (key, value) in entries {
        if key.is_empty() {
            continue;
        }
        let values = match LinkValue::deserialize(value) {
            Ok(value) => value.into_strings(),
            Err(e) => {
                decoded.skipped.push(StoreError::EntryCorrupt { key, reason: e.to_string() });
                continue;
            }
        };
        if values.is_empty() {
            continue;
        }

        if let Some(pairs) = forward(&key, &values) {
            decoded.pairs.extend(pairs);
        } else if let Some(pairs) = reversed(&key, &values) {
            decoded.reversed += 1;
            decoded.pairs.extend(pairs);
        } else {
            decoded.skipped.push(StoreError::EntryCorrupt {
                key,
                reason: "neither the key nor its values are UUIDs".to_string(),
            });
        }
    }

    Ok(decoded)
}

/// Length of the hyphenated form, the only one [`encode`] writes.
const HYPHENATED_LEN: usize = 36;

/// Parses a local id in hyphenated form only.
///
/// `Uuid::parse_str` also takes the simple, braced and urn forms; an
/// external id that happens to be 32 hex digits must not read as a UUID.
fn parse_local(s: &str) -> Option<Uuid> {
    if s.len() != HYPHENATED_LEN {
        return None;
    }
    Uuid::parse_str(s).ok()
}

/// Reads the entry as `external id -> [uuid]`.
fn forward(key: &str, values: &[String]) -> Option<Vec<(String, Uuid)>> {
    if key.trim().is_empty() {
        return None;
    }
    values.iter().map(|v| parse_local(v).map(|local| (key.to_string(), local))).collect()
}

/// Reads the entry as `uuid -> [external id]`.
fn reversed(key: &str, values: &[String]) -> Option<Vec<(String, Uuid)>> {
    let local = parse_local(key)?;
    values.iter().map(|v| (!v.trim().is_empty()).then(|| (v.clone(), local))).collect()
}

/// Encodes the `external -> [local]` index as a compact JSON document.
///
/// External ids with no local ids are omitted.
pub(crate) fn encode(by_external: &BTreeMap<String, Vec<Uuid>>) -> String {
    let mut document = Map::new();
    for (external_id, locals) in by_external {
        let value = match locals.as_slice() {
            [] => continue,
            [single] => Value::String(single.to_string()),
            many => Value::Array(many.iter().map(|l| Value::String(l.to_string())).collect()),
        };
        document.insert(external_id.clone(), value);
    }
    Value::Object(document).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "4b1e3b8c-3f0a-4c55-9d8e-0f1a2b3c4d5e";
    const B: &str = "9f8e7d6c-5b4a-4392-8170-6f5e4d3c2b1a";

    fn uuid(s: &str) -> Uuid {
        Uuid::parse_str(s).unwrap()
    }

    #[test]
    fn blank_content_is_empty() {
        let decoded = decode("  \n\t").unwrap();
        assert!(decoded.pairs.is_empty());
        assert!(!decoded.primitive_document);
    }

    #[test]
    fn primitive_document_reads_as_empty() {
        for doc in ["\"hello\"", "42", "null", "true"] {
            let decoded = decode(doc).unwrap();
            assert!(decoded.pairs.is_empty(), "{doc}");
            assert!(decoded.primitive_document, "{doc}");
        }
    }

    #[test]
    fn syntax_errors_are_fatal() {
        assert!(decode("{\"1\": ").is_err());
        assert!(decode("not json").is_err());
    }

    #[test]
    fn array_document_is_fatal() {
        let err = decode(&format!("[\"{A}\"]")).unwrap_err();
        assert!(err.contains("array"));
    }

    #[test]
    fn accepts_single_and_array_forms() {
        let doc = format!(r#"{{"111": "{A}", "222": ["{B}"], "333": ["{A}", "{B}"]}}"#);
        let decoded = decode(&doc).unwrap();

        assert_eq!(
            decoded.pairs,
            vec![
                ("111".to_string(), uuid(A)),
                ("222".to_string(), uuid(B)),
                ("333".to_string(), uuid(A)),
                ("333".to_string(), uuid(B)),
            ]
        );
        assert_eq!(decoded.reversed, 0);
        assert!(decoded.skipped.is_empty());
    }

    #[test]
    fn empty_keys_and_empty_values_are_dropped() {
        let doc = format!(r#"{{"": "{A}", "111": ["", "{B}", ""], "222": [], "333": ""}}"#);
        let decoded = decode(&doc).unwrap();

        assert_eq!(decoded.pairs, vec![("111".to_string(), uuid(B))]);
        assert!(decoded.skipped.is_empty());
    }

    #[test]
    fn swapped_orientation_is_recovered() {
        let doc = format!(r#"{{"{A}": "111", "{B}": ["222", "333"]}}"#);
        let decoded = decode(&doc).unwrap();

        assert_eq!(decoded.reversed, 2);
        assert_eq!(
            decoded.pairs,
            vec![
                ("111".to_string(), uuid(A)),
                ("222".to_string(), uuid(B)),
                ("333".to_string(), uuid(B)),
            ]
        );
    }

    #[test]
    fn corrupt_entry_is_skipped_and_others_kept() {
        let doc = format!(r#"{{"111": "{A}", "222": "not-a-uuid", "333": 7, "444": {{"x": 1}}}}"#);
        let decoded = decode(&doc).unwrap();

        assert_eq!(decoded.pairs, vec![("111".to_string(), uuid(A))]);
        let keys: Vec<&str> = decoded
            .skipped
            .iter()
            .filter_map(|e| match e {
                StoreError::EntryCorrupt { key, .. } => Some(key.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(keys, vec!["222", "333", "444"]);
    }

    #[test]
    fn partially_valid_array_is_skipped_whole() {
        let doc = format!(r#"{{"111": ["{A}", "garbage"]}}"#);
        let decoded = decode(&doc).unwrap();

        assert!(decoded.pairs.is_empty());
        assert_eq!(decoded.skipped.len(), 1);
    }

    #[test]
    fn only_hyphenated_uuids_are_local_ids() {
        let simple = A.replace('-', "");
        let braced = format!("{{{A}}}");
        let urn = format!("urn:uuid:{A}");

        let doc = format!(
            r#"{{"111": "{simple}", "222": "{braced}", "333": "{urn}", "{simple}": "{B}"}}"#
        );
        let decoded = decode(&doc).unwrap();

        assert_eq!(decoded.pairs, vec![(simple, uuid(B))]);
        assert_eq!(decoded.reversed, 0);
        assert_eq!(decoded.skipped.len(), 3);
    }

    #[test]
    fn encode_uses_bare_string_for_single_link() {
        let mut index = BTreeMap::new();
        index.insert("111".to_string(), vec![uuid(A)]);
        index.insert("222".to_string(), vec![uuid(A), uuid(B)]);
        index.insert("333".to_string(), Vec::new());

        let encoded = encode(&index);
        let value: Value = serde_json::from_str(&encoded).unwrap();

        assert_eq!(value["111"], Value::String(A.to_string()));
        assert_eq!(value["222"], serde_json::json!([A, B]));
        assert!(value.get("333").is_none());
    }
}

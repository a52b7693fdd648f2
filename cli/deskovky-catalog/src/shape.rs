//! Normalization of the catalog's loosely defined response shapes.
//!
//! The backend is undocumented and has answered with bare lists, lists
//! nested under a handful of conventional keys, and bare objects. Each
//! operation declares the extraction rules it accepts; the first rule that
//! matches structurally wins and nothing is ever merged.

use serde_json::Value;

use crate::types::Record;

/// Extraction rules for operations returning a list of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListShape {
    /// Keys checked, in order, for a nested list when the payload is an object.
    pub wrapper_keys: &'static [&'static str],
    /// Treat an object without any wrapper key as a single result.
    pub wrap_single: bool,
}

impl ListShape {
    pub const SEARCH: ListShape = ListShape {
        wrapper_keys: &["games", "data", "results", "items"],
        wrap_single: true,
    };
    pub const GAMES: ListShape = ListShape {
        wrapper_keys: &["games", "data", "results", "items"],
        wrap_single: false,
    };
    pub const CATEGORIES: ListShape = ListShape {
        wrapper_keys: &["categories", "data", "results", "items"],
        wrap_single: false,
    };

    /// Extract the records from a decoded payload.
    ///
    /// An empty result means "no match", callers move on to the next
    /// candidate endpoint. List entries that are not objects are dropped.
    pub fn extract(&self, payload: Value) -> Vec<Record> {
        if is_empty_payload(&payload) {
            return Vec::new();
        }

        match payload {
            Value::Array(items) => into_records(items),
            Value::Object(mut map) => {
                let wrapper = self
                    .wrapper_keys
                    .iter()
                    .find(|key| matches!(map.get(**key), Some(Value::Array(_))));

                match wrapper.and_then(|key| map.remove(*key)) {
                    Some(Value::Array(items)) => into_records(items),
                    _ if self.wrap_single => vec![Record::from(map)],
                    _ => Vec::new(),
                }
            },
            _ => Vec::new(),
        }
    }
}

/// Extraction rules for operations returning a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordShape {
    /// Keys checked, in order; the first one present holds the record.
    pub unwrap_keys: &'static [&'static str],
}

impl RecordShape {
    pub const GAME: RecordShape = RecordShape {
        unwrap_keys: &["game", "data"],
    };

    /// Extract a single record from a decoded payload.
    ///
    /// An object without any unwrap key is the record itself. If an unwrap
    /// key is present but does not hold a non-empty object there is no match.
    pub fn extract(&self, payload: Value) -> Option<Record> {
        if is_empty_payload(&payload) {
            return None;
        }

        let Value::Object(mut map) = payload else {
            return None;
        };

        for key in self.unwrap_keys {
            if let Some(inner) = map.remove(*key) {
                return Record::from_value(inner).filter(|record| !record.is_empty());
            }
        }

        Some(Record::from(map))
    }
}

/// Payloads that carry no data at all, regardless of their type.
fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn into_records(items: Vec<Value>) -> Vec<Record> {
    items.into_iter().filter_map(Record::from_value).collect()
}

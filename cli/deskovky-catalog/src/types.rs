//! Catalog interaction types.

use derive_more::{Deref, DerefMut, From};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Maximum number of results a list operation returns.
///
/// Sent upstream as `limit` but always enforced client side as well.
pub type SearchLimit = usize;

pub const DEFAULT_SEARCH_LIMIT: SearchLimit = 10;

/// A single game or category entry, exactly as upstream returned it.
///
/// There is no fixed schema. Consumers look fields up defensively and treat
/// a missing field as "not shown".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Deref, DerefMut, From)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wrap a JSON value if it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Render a field for display.
    ///
    /// Strings are returned without quotes, other scalars and nested values
    /// as JSON text. `null` counts as absent.
    pub fn get_display(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

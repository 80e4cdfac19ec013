//! Step data source reference.

use serde_json::Value;

/// Authoritative origin of step data, distinguished by name and referenced
/// by server-assigned id. Immutable reference data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub id: i64,
    pub name: String,
}

impl Source {
    /// Decode from a server payload. Both `id` and `name` are required.
    pub fn from_json(json: &Value) -> Option<Self> {
        Some(Self {
            id: json.get("id")?.as_i64()?,
            name: json.get("name")?.as_str()?.to_string(),
        })
    }
}

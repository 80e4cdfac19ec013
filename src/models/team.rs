//! Team model.

use serde_json::Value;

/// A team participants can join. Read-only on this side; membership changes
/// go through the participant PATCH operations.
#[derive(Debug, Clone)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub creator_id: Option<String>,
}

impl Team {
    /// Decode from a server payload. `id` and `name` are required.
    pub fn from_json(json: &Value) -> Option<Self> {
        Some(Self {
            id: json.get("id")?.as_i64()?,
            name: json.get("name")?.as_str()?.to_string(),
            creator_id: json
                .get("creator_id")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

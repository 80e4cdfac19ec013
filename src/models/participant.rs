// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Challenge participant model.

use serde_json::Value;

use crate::models::{Event, Record};

/// A participant and the state the server holds for them. The record
/// collection is read-only on this side; the server owns its ordering.
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: Option<i64>,
    pub fbid: String,
    pub records: Vec<Record>,
    pub current_event: Option<Event>,
}

impl Participant {
    /// Decode from a server payload. `fbid` is required; records that fail
    /// to decode are skipped rather than failing the participant.
    pub fn from_json(json: &Value) -> Option<Self> {
        let fbid = json.get("fbid")?.as_str()?.to_string();

        let records = json
            .get("records")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(Record::from_json).collect())
            .unwrap_or_default();

        Some(Self {
            id: json.get("id").and_then(Value::as_i64),
            fbid,
            records,
            current_event: json.get("current_event").and_then(Event::from_json),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_participant_with_records() {
        let participant = Participant::from_json(&json!({
            "id": 11,
            "fbid": "1234567890",
            "records": [
                {"date": "2024-01-15T00:00:00Z", "distance": 100, "participant_id": "1234567890"},
                {"distance": 200},
                {"date": "2024-01-16T00:00:00Z", "distance": 300, "participant_id": "1234567890"}
            ]
        }))
        .unwrap();

        assert_eq!(participant.id, Some(11));
        // Undecodable entry is skipped, not fatal
        assert_eq!(participant.records.len(), 2);
        assert_eq!(participant.records[1].distance, 300);
        assert!(participant.current_event.is_none());
    }

    #[test]
    fn test_decode_requires_fbid() {
        assert!(Participant::from_json(&json!({"id": 11})).is_none());
    }

    #[test]
    fn test_decode_current_event() {
        let participant = Participant::from_json(&json!({
            "fbid": "fb1",
            "current_event": {
                "id": 2,
                "challenge_start": "2024-01-14T00:00:00Z",
                "challenge_end": "2024-03-14T00:00:00Z"
            }
        }))
        .unwrap();

        assert!(participant.records.is_empty());
        assert_eq!(participant.current_event.unwrap().id, Some(2));
    }
}

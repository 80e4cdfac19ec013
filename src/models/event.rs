//! Challenge event model.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::time_utils::parse_utc_rfc3339;

/// Bounds of a challenge phase. Used as the fallback anchor when a
/// participant has no records yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengePhase {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// An event a participant can be enrolled in. The server guarantees at most
/// one current event per participant.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub challenge_phase: ChallengePhase,
}

impl Event {
    /// Decode from a server payload. The phase bounds are required and
    /// parsed strictly; an event without a valid phase is treated as absent.
    pub fn from_json(json: &Value) -> Option<Self> {
        let start = parse_utc_rfc3339(json.get("challenge_start")?.as_str()?)?;
        let end = parse_utc_rfc3339(json.get("challenge_end")?.as_str()?)?;

        Some(Self {
            id: json.get("id").and_then(Value::as_i64),
            name: json
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string),
            challenge_phase: ChallengePhase { start, end },
        })
    }
}

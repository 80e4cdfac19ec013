// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Step record model.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::models::Source;
use crate::time_utils::parse_utc_rfc3339;

/// A step count attributed to a participant at a point in time.
#[derive(Debug, Clone)]
pub struct Record {
    /// Server-assigned id (absent for not-yet-created records)
    pub id: Option<i64>,
    /// Instant the steps were attributed to
    pub date: DateTime<Utc>,
    /// Step count. Zero is a valid count, not absence.
    pub distance: i64,
    /// Owning participant identity (`participant_id` on the wire)
    pub fbid: String,
    /// Originating data source, when the server includes it
    pub source: Option<Source>,
}

impl Record {
    /// Decode from a server payload.
    ///
    /// `date`, `distance` and `participant_id` are required; `id` and
    /// `source` are absorbed as `None` when missing or malformed. A `date`
    /// that is present but unparsable attributes the record to the current
    /// instant instead of failing the record.
    pub fn from_json(json: &Value) -> Option<Self> {
        let raw_date = json.get("date")?.as_str()?;
        let distance = json.get("distance")?.as_i64()?;
        let fbid = match json.get("participant_id")? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };

        let date = match parse_utc_rfc3339(raw_date) {
            Some(date) => date,
            None => {
                tracing::debug!(raw = raw_date, "Record date unparsable, attributing to now");
                Utc::now()
            }
        };

        Some(Self {
            id: json.get("id").and_then(Value::as_i64),
            date,
            distance,
            fbid,
            source: json.get("source").and_then(Source::from_json),
        })
    }
}

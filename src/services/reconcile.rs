// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Step-record reconciliation engine.
//!
//! One pass:
//! 1. Read the authorized pedometer source
//! 2. Resolve the matching server-side source identity
//! 3. Fetch the participant
//! 4. Compute the interval missing on the backend
//! 5. Query the provider for the step count
//! 6. Submit a record dated at the interval's end
//!
//! Every failing step ends the pass without a user-visible error; the pass
//! re-runs on the next launch. Logical exits (nothing to do) are not
//! failures and log at debug only.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::models::{Participant, Source};
use crate::providers::{PedometerSource, ProviderRegistry};
use crate::services::challenge::ChallengeApi;
use crate::time_utils::DateInterval;

/// How a reconciliation pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// A record was submitted for the interval.
    Submitted { interval: DateInterval, steps: i64 },
    /// Another pass for this participant is still in flight.
    Overlapping,
    /// No pedometer source is authorized; nothing to reconcile.
    NoAuthorizedSource,
    /// The server has no source matching the provider, or the lookup failed.
    NoServerSource,
    /// The participant could not be fetched or decoded.
    NoParticipant,
    /// Neither a record nor a current challenge supplies an anchor date.
    NoAnchor,
    /// The anchor is not strictly in the past; nothing to reconcile yet.
    UpToDate,
    /// The provider query failed.
    ProviderFailed,
    /// The record submission failed.
    SubmitFailed,
}

/// Orchestrates one reconciliation pass per trigger.
pub struct ReconcileEngine {
    api: Arc<dyn ChallengeApi>,
    providers: ProviderRegistry,
    fbid: String,
    authorized_source: Option<PedometerSource>,
    /// Per-participant pass lock; a pass that finds it held skips.
    pass_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ReconcileEngine {
    pub fn new(
        api: Arc<dyn ChallengeApi>,
        providers: ProviderRegistry,
        fbid: String,
        authorized_source: Option<PedometerSource>,
    ) -> Self {
        Self {
            api,
            providers,
            fbid,
            authorized_source,
            pass_locks: DashMap::new(),
        }
    }

    /// Run one reconciliation pass. Never fails outward: every ending is a
    /// [`PassOutcome`], logged here.
    pub async fn run_pass(&self) -> PassOutcome {
        let lock = self
            .pass_locks
            .entry(self.fbid.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let Ok(_guard) = lock.try_lock() else {
            tracing::debug!(fbid = %self.fbid, "Reconciliation pass already in flight, skipping");
            return PassOutcome::Overlapping;
        };

        // 1. Authorized source
        let Some(source) = self.authorized_source else {
            tracing::debug!("No authorized pedometer source, nothing to reconcile");
            return PassOutcome::NoAuthorizedSource;
        };
        let provider = self.providers.provider(source);

        // 2. Server-side source identity
        let server_source = match self.api.get_source_by_name(provider.source_name()).await {
            Ok(response) => response.payload.as_ref().and_then(Source::from_json),
            Err(error) => {
                tracing::warn!(error = %error, "Source lookup failed");
                None
            }
        };
        let Some(server_source) = server_source else {
            tracing::debug!(
                name = provider.source_name(),
                "No matching source on the server"
            );
            return PassOutcome::NoServerSource;
        };

        // 3. Participant
        let participant = match self.api.get_participant(&self.fbid).await {
            Ok(response) => response.payload.as_ref().and_then(Participant::from_json),
            Err(error) => {
                tracing::warn!(error = %error, "Participant fetch failed");
                None
            }
        };
        let Some(participant) = participant else {
            tracing::debug!(fbid = %self.fbid, "Participant unavailable");
            return PassOutcome::NoParticipant;
        };
        let Some(participant_id) = participant.id else {
            tracing::debug!(fbid = %self.fbid, "Participant has no server id");
            return PassOutcome::NoParticipant;
        };

        // 4. Missing interval
        let Some(anchor) = anchor_date(&participant) else {
            tracing::debug!("No record or challenge start to anchor the interval");
            return PassOutcome::NoAnchor;
        };
        let Some(interval) = missing_interval(anchor, Utc::now()) else {
            tracing::debug!(anchor = %anchor, "Anchor not in the past, nothing to reconcile");
            return PassOutcome::UpToDate;
        };

        // 5. Provider query
        let steps = match provider.retrieve_step_count(&interval).await {
            Ok(steps) => steps,
            Err(error) => {
                tracing::warn!(error = %error, "Unable to query pedometer");
                return PassOutcome::ProviderFailed;
            }
        };

        // 6. Submit, dated at the interval end
        match self
            .api
            .create_record(participant_id, interval.end, steps, server_source.id)
            .await
        {
            Ok(_) => {
                tracing::info!(
                    fbid = %self.fbid,
                    steps,
                    source_id = server_source.id,
                    "Step record submitted"
                );
                PassOutcome::Submitted { interval, steps }
            }
            Err(error) => {
                tracing::warn!(error = %error, "Record submission failed");
                PassOutcome::SubmitFailed
            }
        }
    }
}

/// Anchor for the missing interval: the latest-dated record (ties broken by
/// list order, last wins), falling back to the current challenge start.
fn anchor_date(participant: &Participant) -> Option<DateTime<Utc>> {
    participant
        .records
        .iter()
        .max_by_key(|record| record.date)
        .map(|record| record.date)
        .or_else(|| {
            participant
                .current_event
                .as_ref()
                .map(|event| event.challenge_phase.start)
        })
}

/// The interval still missing on the backend, anchored strictly in the past.
fn missing_interval(anchor: DateTime<Utc>, now: DateTime<Utc>) -> Option<DateInterval> {
    (anchor < now).then(|| DateInterval::new(anchor, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChallengePhase, Event, Record};
    use chrono::{Duration, TimeZone};

    fn record(day: u32, id: i64) -> Record {
        Record {
            id: Some(id),
            date: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            distance: 100,
            fbid: "fb1".to_string(),
            source: None,
        }
    }

    fn participant(records: Vec<Record>, event_start: Option<DateTime<Utc>>) -> Participant {
        Participant {
            id: Some(1),
            fbid: "fb1".to_string(),
            records,
            current_event: event_start.map(|start| Event {
                id: Some(2),
                name: None,
                challenge_phase: ChallengePhase {
                    start,
                    end: start + Duration::days(60),
                },
            }),
        }
    }

    #[test]
    fn test_anchor_is_latest_record_date() {
        let p = participant(vec![record(15, 1), record(17, 2), record(16, 3)], None);
        assert_eq!(
            anchor_date(&p),
            Some(Utc.with_ymd_and_hms(2024, 1, 17, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_anchor_falls_back_to_challenge_start() {
        let start = Utc.with_ymd_and_hms(2024, 1, 14, 0, 0, 0).unwrap();
        let p = participant(vec![], Some(start));
        assert_eq!(anchor_date(&p), Some(start));
    }

    #[test]
    fn test_records_win_over_challenge_start() {
        let start = Utc.with_ymd_and_hms(2024, 1, 14, 0, 0, 0).unwrap();
        let p = participant(vec![record(10, 1)], Some(start));
        // The record anchors even though the challenge started later
        assert_eq!(
            anchor_date(&p),
            Some(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_no_anchor_without_records_or_event() {
        let p = participant(vec![], None);
        assert_eq!(anchor_date(&p), None);
    }

    #[test]
    fn test_missing_interval_requires_past_anchor() {
        let now = Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap();
        let anchor = Utc.with_ymd_and_hms(2024, 1, 14, 0, 0, 0).unwrap();

        let interval = missing_interval(anchor, now).unwrap();
        assert_eq!(interval.start, anchor);
        assert_eq!(interval.end, now);

        assert_eq!(missing_interval(now, now), None);
        assert_eq!(missing_interval(now + Duration::days(1), now), None);
    }
}

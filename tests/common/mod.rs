// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Offline doubles for the gate and engine tests: a scripted challenge API,
//! a scripted pedometer provider, and a counting shell.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use steps_sync::providers::{PedometerProvider, ProviderError, ProviderRegistry};
use steps_sync::services::challenge::{ApiResponse, ChallengeApi, ServiceError, ServiceResult};
use steps_sync::services::SessionShell;
use steps_sync::time_utils::{format_utc_rfc3339, DateInterval};

/// Scripted challenge API. Calls are recorded in order; each operation
/// answers with its canned payload, or a 500 when the payload is `None`.
pub struct ScriptedApi {
    pub fail_health: bool,
    pub sources_payload: Option<Value>,
    pub participant_payload: Option<Value>,
    pub fail_create_record: bool,
    pub calls: Mutex<Vec<String>>,
    pub submitted: Mutex<Vec<Value>>,
}

impl Default for ScriptedApi {
    fn default() -> Self {
        Self {
            fail_health: false,
            sources_payload: Some(sources_payload()),
            participant_payload: None,
            fail_create_record: false,
            calls: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedApi {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn submitted(&self) -> Vec<Value> {
        self.submitted.lock().unwrap().clone()
    }

    fn record_call(&self, name: impl Into<String>) {
        self.calls.lock().unwrap().push(name.into());
    }
}

#[async_trait]
impl ChallengeApi for ScriptedApi {
    async fn health_check(&self) -> ServiceResult {
        self.record_call("health_check");
        if self.fail_health {
            return Err(ServiceError::Status {
                status: 503,
                body: None,
            });
        }
        Ok(ApiResponse {
            status: 200,
            payload: None,
        })
    }

    async fn get_participant(&self, fbid: &str) -> ServiceResult {
        self.record_call(format!("get_participant:{fbid}"));
        match &self.participant_payload {
            Some(payload) => Ok(ApiResponse {
                status: 200,
                payload: Some(payload.clone()),
            }),
            None => Err(ServiceError::Status {
                status: 500,
                body: None,
            }),
        }
    }

    async fn get_sources(&self) -> ServiceResult {
        self.record_call("get_sources");
        match &self.sources_payload {
            Some(payload) => Ok(ApiResponse {
                status: 200,
                payload: Some(payload.clone()),
            }),
            None => Err(ServiceError::Status {
                status: 500,
                body: None,
            }),
        }
    }

    async fn create_record(
        &self,
        participant_id: i64,
        date: DateTime<Utc>,
        steps: i64,
        source_id: i64,
    ) -> ServiceResult {
        self.record_call("create_record");
        if self.fail_create_record {
            return Err(ServiceError::Status {
                status: 500,
                body: None,
            });
        }
        self.submitted.lock().unwrap().push(json!({
            "date": format_utc_rfc3339(date),
            "distance": steps,
            "participant_id": participant_id,
            "source_id": source_id,
        }));
        Ok(ApiResponse {
            status: 201,
            payload: None,
        })
    }
}

/// Scripted pedometer provider. Records the queried intervals; answers with
/// the canned step count or `NoData`.
pub struct ScriptedProvider {
    pub steps: Option<i64>,
    pub delay: Option<Duration>,
    pub queried: Mutex<Vec<DateInterval>>,
}

impl ScriptedProvider {
    pub fn with_steps(steps: i64) -> Self {
        Self {
            steps: Some(steps),
            delay: None,
            queried: Mutex::new(Vec::new()),
        }
    }

    #[allow(dead_code)]
    pub fn failing() -> Self {
        Self {
            steps: None,
            delay: None,
            queried: Mutex::new(Vec::new()),
        }
    }

    #[allow(dead_code)]
    pub fn queried(&self) -> Vec<DateInterval> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl PedometerProvider for ScriptedProvider {
    fn source_name(&self) -> &'static str {
        "HealthKit"
    }

    async fn retrieve_step_count(&self, interval: &DateInterval) -> Result<i64, ProviderError> {
        self.queried.lock().unwrap().push(*interval);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.steps.ok_or(ProviderError::NoData)
    }
}

/// Shell that counts the signals it receives.
#[allow(dead_code)]
#[derive(Default)]
pub struct CountingShell {
    pub logouts: AtomicUsize,
    pub errors: AtomicUsize,
}

impl SessionShell for CountingShell {
    fn force_logout(&self) {
        self.logouts.fetch_add(1, Ordering::SeqCst);
    }

    fn present_blocking_error(&self, _message: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }
}

/// Registry answering every source with the same provider.
pub fn registry_with(provider: Arc<dyn PedometerProvider>) -> ProviderRegistry {
    ProviderRegistry::new(provider.clone(), provider)
}

/// Server sources as the backend lists them.
pub fn sources_payload() -> Value {
    json!([
        {"id": 3, "name": "HealthKit"},
        {"id": 7, "name": "Fitbit"}
    ])
}

/// A participant payload with the given records and optional challenge start.
pub fn participant_payload(records: Value, challenge_start: Option<&str>) -> Value {
    let mut payload = json!({
        "id": 11,
        "fbid": "1234567890",
        "records": records,
    });
    if let Some(start) = challenge_start {
        payload["current_event"] = json!({
            "id": 2,
            "name": "Spring Challenge",
            "challenge_start": start,
            "challenge_end": "2030-01-01T00:00:00Z",
        });
    }
    payload
}

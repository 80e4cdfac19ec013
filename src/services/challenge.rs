// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Challenge backend API client.
//!
//! Thin request/response layer over the backend's REST surface:
//! - builds URLs from the endpoint model
//! - issues one round trip per call (no retries; callers decide)
//! - classifies every outcome into a uniform success/failed result

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode, Url};
use serde_json::{json, Value};

use crate::models::Source;
use crate::time_utils::format_utc_rfc3339;

/// Challenge backend endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    HealthCheck,
    Participant(String),
    Participants,
    Team(i64),
    Teams,
    Event(i64),
    Events,
    Record(i64),
    Records,
    Source(i64),
    Sources,
    Commitments,
    Commitment(i64),
}

impl Endpoint {
    /// Path relative to the server base URL.
    pub fn path(&self) -> String {
        match self {
            Endpoint::HealthCheck => "/".to_string(),
            Endpoint::Participant(fbid) => {
                format!("/participants/{}", urlencoding::encode(fbid))
            }
            Endpoint::Participants => "/participants".to_string(),
            Endpoint::Team(team_id) => format!("/teams/{team_id}"),
            Endpoint::Teams => "/teams".to_string(),
            Endpoint::Event(event_id) => format!("/events/{event_id}"),
            Endpoint::Events => "/events".to_string(),
            Endpoint::Record(record_id) => format!("/records/{record_id}"),
            Endpoint::Records => "/records".to_string(),
            Endpoint::Source(source_id) => format!("/sources/{source_id}"),
            Endpoint::Sources => "/sources".to_string(),
            Endpoint::Commitments => "/commitments".to_string(),
            Endpoint::Commitment(commitment_id) => format!("/commitments/{commitment_id}"),
        }
    }
}

/// Successful response: status code plus the decoded payload, if any.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub payload: Option<Value>,
}

/// Uniform failure classification for a request. Callers never distinguish
/// the variants; any `Err` is "failed".
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// URL construction failed; no network attempt was made.
    #[error("Malformed request URL")]
    Url,

    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status}")]
    Status { status: u16, body: Option<String> },

    #[error("Undecodable response body: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ServiceResult = Result<ApiResponse, ServiceError>;

/// The slice of the backend the health gate and reconciliation engine use.
/// Implemented by [`ChallengeClient`]; tests substitute an offline double.
#[async_trait]
pub trait ChallengeApi: Send + Sync {
    async fn health_check(&self) -> ServiceResult;

    async fn get_participant(&self, fbid: &str) -> ServiceResult;

    async fn get_sources(&self) -> ServiceResult;

    async fn create_record(
        &self,
        participant_id: i64,
        date: DateTime<Utc>,
        steps: i64,
        source_id: i64,
    ) -> ServiceResult;

    /// Resolve a server source by name. The backend has no by-name endpoint,
    /// so this lists sources and filters client-side; a success with no
    /// payload means no source carries that name.
    async fn get_source_by_name(&self, name: &str) -> ServiceResult {
        let response = self.get_sources().await?;

        let matched = response
            .payload
            .as_ref()
            .and_then(Value::as_array)
            .and_then(|sources| {
                sources
                    .iter()
                    .find(|entry| {
                        Source::from_json(entry).is_some_and(|source| source.name == name)
                    })
                    .cloned()
            });

        Ok(ApiResponse {
            status: response.status,
            payload: matched,
        })
    }
}

/// Challenge backend client.
#[derive(Clone)]
pub struct ChallengeClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChallengeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a request URL from an endpoint and optional query pairs.
    fn build_url(
        &self,
        endpoint: &Endpoint,
        query: Option<&[(String, String)]>,
    ) -> Result<Url, ServiceError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, endpoint.path()))
            .map_err(|_| ServiceError::Url)?;

        if let Some(pairs) = query {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(url)
    }

    /// Issue a request and classify the outcome.
    async fn request(
        &self,
        method: Method,
        endpoint: Endpoint,
        query: Option<&[(String, String)]>,
        parameters: Option<Value>,
    ) -> ServiceResult {
        let url = self.build_url(&endpoint, query)?;

        let mut builder = self.http.request(method, url);
        if let Some(body) = parameters {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        classify(status, &body)
    }

    // ─── Typed wrappers ──────────────────────────────────────────────────────

    pub async fn create_participant(&self, fbid: &str) -> ServiceResult {
        self.request(
            Method::POST,
            Endpoint::Participants,
            None,
            Some(json!({ "fbid": fbid })),
        )
        .await
    }

    pub async fn delete_participant(&self, fbid: &str) -> ServiceResult {
        self.request(
            Method::DELETE,
            Endpoint::Participant(fbid.to_string()),
            None,
            None,
        )
        .await
    }

    pub async fn create_team(&self, name: &str, lead_fbid: &str) -> ServiceResult {
        self.request(
            Method::POST,
            Endpoint::Teams,
            None,
            Some(json!({ "name": name, "creator_id": lead_fbid })),
        )
        .await
    }

    pub async fn delete_team(&self, team_id: i64) -> ServiceResult {
        self.request(Method::DELETE, Endpoint::Team(team_id), None, None)
            .await
    }

    pub async fn get_teams(&self) -> ServiceResult {
        self.request(Method::GET, Endpoint::Teams, None, None).await
    }

    pub async fn get_team(&self, team_id: i64) -> ServiceResult {
        self.request(Method::GET, Endpoint::Team(team_id), None, None)
            .await
    }

    pub async fn join_team(&self, fbid: &str, team_id: i64) -> ServiceResult {
        self.request(
            Method::PATCH,
            Endpoint::Participant(fbid.to_string()),
            None,
            Some(json!({ "team_id": team_id })),
        )
        .await
    }

    pub async fn leave_team(&self, fbid: &str) -> ServiceResult {
        // The backend clears the team on the literal string "null"
        self.request(
            Method::PATCH,
            Endpoint::Participant(fbid.to_string()),
            None,
            Some(json!({ "team_id": "null" })),
        )
        .await
    }

    pub async fn get_event(&self, event_id: i64) -> ServiceResult {
        self.request(Method::GET, Endpoint::Event(event_id), None, None)
            .await
    }

    pub async fn get_events(&self) -> ServiceResult {
        self.request(Method::GET, Endpoint::Events, None, None)
            .await
    }

    pub async fn get_record(&self, record_id: i64) -> ServiceResult {
        self.request(Method::GET, Endpoint::Record(record_id), None, None)
            .await
    }

    pub async fn get_source(&self, source_id: i64) -> ServiceResult {
        self.request(Method::GET, Endpoint::Source(source_id), None, None)
            .await
    }

    pub async fn join_event(
        &self,
        fbid: &str,
        event_id: i64,
        commitment_steps: i64,
    ) -> ServiceResult {
        self.request(
            Method::POST,
            Endpoint::Commitments,
            None,
            Some(json!({
                "fbid": fbid,
                "event_id": event_id,
                "commitment": commitment_steps,
            })),
        )
        .await
    }

    pub async fn set_commitment(&self, commitment_id: i64, steps: i64) -> ServiceResult {
        self.request(
            Method::PATCH,
            Endpoint::Commitment(commitment_id),
            None,
            Some(json!({ "commitment": steps })),
        )
        .await
    }
}

#[async_trait]
impl ChallengeApi for ChallengeClient {
    async fn health_check(&self) -> ServiceResult {
        self.request(Method::GET, Endpoint::HealthCheck, None, None)
            .await
    }

    async fn get_participant(&self, fbid: &str) -> ServiceResult {
        self.request(
            Method::GET,
            Endpoint::Participant(fbid.to_string()),
            None,
            None,
        )
        .await
    }

    async fn get_sources(&self) -> ServiceResult {
        self.request(Method::GET, Endpoint::Sources, None, None)
            .await
    }

    async fn create_record(
        &self,
        participant_id: i64,
        date: DateTime<Utc>,
        steps: i64,
        source_id: i64,
    ) -> ServiceResult {
        self.request(
            Method::POST,
            Endpoint::Records,
            None,
            Some(json!({
                "date": format_utc_rfc3339(date),
                "distance": steps,
                "participant_id": participant_id,
                "source_id": source_id,
            })),
        )
        .await
    }
}

/// Classify an HTTP outcome into the uniform result shape.
fn classify(status: StatusCode, body: &[u8]) -> ServiceResult {
    if !status.is_success() {
        return Err(ServiceError::Status {
            status: status.as_u16(),
            body: (!body.is_empty()).then(|| String::from_utf8_lossy(body).into_owned()),
        });
    }

    if body.is_empty() {
        return Ok(ApiResponse {
            status: status.as_u16(),
            payload: None,
        });
    }

    let payload: Value = serde_json::from_slice(body)?;
    Ok(ApiResponse {
        status: status.as_u16(),
        payload: Some(payload),
    })
}

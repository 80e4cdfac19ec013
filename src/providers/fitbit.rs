// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitbit Web API provider.
//!
//! Fetches the daily step time series for the interval's date range and
//! sums it. Requires a user access token; without one the provider reports
//! itself unauthorized and the pass ends.

use async_trait::async_trait;
use serde::Deserialize;

use super::{PedometerProvider, ProviderError};
use crate::time_utils::DateInterval;

/// Daily step time series response.
#[derive(Debug, Deserialize)]
struct StepsSeriesResponse {
    #[serde(rename = "activities-steps")]
    activities_steps: Vec<StepsSeriesEntry>,
}

#[derive(Debug, Deserialize)]
struct StepsSeriesEntry {
    value: String,
}

/// Provider over the Fitbit activities API.
pub struct FitbitProvider {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl FitbitProvider {
    pub fn new(access_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://api.fitbit.com".to_string(),
            access_token,
        }
    }

    /// Sum a step series. The series carries counts as decimal strings;
    /// entries that fail to parse are dropped.
    fn sum_series(series: &StepsSeriesResponse) -> Result<i64, ProviderError> {
        if series.activities_steps.is_empty() {
            return Err(ProviderError::NoData);
        }

        Ok(series
            .activities_steps
            .iter()
            .filter_map(|entry| entry.value.parse::<i64>().ok())
            .sum())
    }
}

#[async_trait]
impl PedometerProvider for FitbitProvider {
    fn source_name(&self) -> &'static str {
        "Fitbit"
    }

    async fn retrieve_step_count(&self, interval: &DateInterval) -> Result<i64, ProviderError> {
        let token = self
            .access_token
            .as_deref()
            .ok_or(ProviderError::NotAuthorized)?;

        let url = format!(
            "{}/1/user/-/activities/steps/date/{}/{}.json",
            self.base_url,
            interval.start.format("%Y-%m-%d"),
            interval.end.format("%Y-%m-%d"),
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ProviderError::Api(e.to_string()))?;

        if response.status().as_u16() == 401 {
            return Err(ProviderError::NotAuthorized);
        }
        if !response.status().is_success() {
            return Err(ProviderError::Api(format!("HTTP {}", response.status())));
        }

        let series: StepsSeriesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Api(e.to_string()))?;

        Self::sum_series(&series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_missing_token_is_not_authorized() {
        let provider = FitbitProvider::new(None);
        let interval = DateInterval::new(
            Utc.with_ymd_and_hms(2024, 1, 14, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap(),
        );

        let err = provider.retrieve_step_count(&interval).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotAuthorized));
    }

    #[test]
    fn test_sum_series() {
        let series: StepsSeriesResponse = serde_json::from_str(
            r#"{"activities-steps": [
                {"dateTime": "2024-01-14", "value": "1200"},
                {"dateTime": "2024-01-15", "value": "3000"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(FitbitProvider::sum_series(&series).unwrap(), 4200);
    }

    #[test]
    fn test_empty_series_is_no_data() {
        let series: StepsSeriesResponse =
            serde_json::from_str(r#"{"activities-steps": []}"#).unwrap();
        assert!(matches!(
            FitbitProvider::sum_series(&series).unwrap_err(),
            ProviderError::NoData
        ));
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Motion-history provider backed by the platform health store.
//!
//! The host exports step samples for the agent as a JSON log. Every query
//! reads the log fresh and sums the samples falling inside the interval;
//! nothing is cached across passes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{PedometerProvider, ProviderError};
use crate::time_utils::DateInterval;

/// One step sample from the health store export.
#[derive(Debug, Clone, Deserialize)]
pub struct StepSample {
    pub date: DateTime<Utc>,
    pub steps: i64,
}

/// Provider over the exported HealthKit sample log.
pub struct HealthKitProvider {
    samples_path: PathBuf,
}

impl HealthKitProvider {
    pub fn new<P: AsRef<Path>>(samples_path: P) -> Self {
        Self {
            samples_path: samples_path.as_ref().to_path_buf(),
        }
    }

    /// Sum the samples inside the interval, using the store's sample
    /// predicate: `start <= date < end`.
    fn sum_samples(samples: &[StepSample], interval: &DateInterval) -> Result<i64, ProviderError> {
        let mut total: i64 = 0;
        let mut matched = false;

        for sample in samples {
            if sample.date >= interval.start && sample.date < interval.end {
                total += sample.steps;
                matched = true;
            }
        }

        if matched {
            Ok(total)
        } else {
            Err(ProviderError::NoData)
        }
    }
}

#[async_trait]
impl PedometerProvider for HealthKitProvider {
    fn source_name(&self) -> &'static str {
        "HealthKit"
    }

    async fn retrieve_step_count(&self, interval: &DateInterval) -> Result<i64, ProviderError> {
        let raw = match tokio::fs::read_to_string(&self.samples_path).await {
            Ok(raw) => raw,
            // A missing export means the store never granted us access
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ProviderError::NotAuthorized)
            }
            Err(e) => return Err(ProviderError::Store(e.to_string())),
        };

        let samples: Vec<StepSample> =
            serde_json::from_str(&raw).map_err(|e| ProviderError::Store(e.to_string()))?;

        Self::sum_samples(&samples, interval)
    }
}

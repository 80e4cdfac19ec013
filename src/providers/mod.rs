// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pedometer data providers.
//!
//! A provider is the concrete local capability that answers "how many steps
//! in this interval". Exactly one provider is active per reconciliation
//! pass, selected from the registry by the authorized source; there is no
//! multi-source aggregation.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::time_utils::DateInterval;

pub mod fitbit;
pub mod healthkit;

pub use fitbit::FitbitProvider;
pub use healthkit::HealthKitProvider;

/// Pedometer sources a user can authorize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PedometerSource {
    HealthKit,
    Fitbit,
}

impl PedometerSource {
    /// The `Source.name` the challenge backend uses for this source.
    pub fn server_name(self) -> &'static str {
        match self {
            Self::HealthKit => "HealthKit",
            Self::Fitbit => "Fitbit",
        }
    }
}

/// Error for an unrecognized pedometer source name.
#[derive(Debug, thiserror::Error)]
#[error("Unknown pedometer source")]
pub struct UnknownSource;

impl FromStr for PedometerSource {
    type Err = UnknownSource;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "healthkit" => Ok(Self::HealthKit),
            "fitbit" => Ok(Self::Fitbit),
            _ => Err(UnknownSource),
        }
    }
}

/// Capability over concrete step-count sources.
#[async_trait]
pub trait PedometerProvider: Send + Sync {
    /// The server-side `Source.name` this provider's data is attributed to.
    fn source_name(&self) -> &'static str;

    /// Retrieve the step count for the given interval.
    async fn retrieve_step_count(&self, interval: &DateInterval) -> Result<i64, ProviderError>;
}

/// Provider failures. All of these end the current reconciliation pass;
/// none is fatal.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider not authorized")]
    NotAuthorized,

    #[error("No step data available for the interval")]
    NoData,

    #[error("Sample store error: {0}")]
    Store(String),

    #[error("Provider API error: {0}")]
    Api(String),
}

/// Maps an authorized source to its provider.
pub struct ProviderRegistry {
    healthkit: Arc<dyn PedometerProvider>,
    fitbit: Arc<dyn PedometerProvider>,
}

impl ProviderRegistry {
    pub fn new(healthkit: Arc<dyn PedometerProvider>, fitbit: Arc<dyn PedometerProvider>) -> Self {
        Self { healthkit, fitbit }
    }

    /// The provider backing the given source.
    pub fn provider(&self, source: PedometerSource) -> Arc<dyn PedometerProvider> {
        match source {
            PedometerSource::HealthKit => self.healthkit.clone(),
            PedometerSource::Fitbit => self.fitbit.clone(),
        }
    }
}

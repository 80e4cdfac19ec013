// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! Each subsystem carries its own error enum; this module aggregates them
//! for the binary entrypoint. Reconciliation itself never surfaces these as
//! fatal conditions (see `services::reconcile`).

use crate::config::ConfigError;
use crate::providers::ProviderError;
use crate::services::challenge::ServiceError;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Challenge API error: {0}")]
    Service(#[from] ServiceError),

    #[error("Pedometer provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for the binary
pub type Result<T> = std::result::Result<T, AppError>;

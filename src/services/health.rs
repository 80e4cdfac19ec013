// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Connectivity health gate.
//!
//! Probes the challenge backend before anything else runs. On failure the
//! shell collaborator is told to drop back to the unauthenticated state and
//! show a blocking notice; on success the reconciliation pass is handed off
//! to a background task and the gate returns without waiting for it.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::services::challenge::ChallengeApi;
use crate::services::reconcile::{PassOutcome, ReconcileEngine};

/// Notice shown when the backend cannot be reached.
pub const UNREACHABLE_NOTICE: &str =
    "Unable to connect to the challenge service. Please try again later.";

/// Outward interface to the UI layer. Implementations own dispatching onto
/// their foreground context.
pub trait SessionShell: Send + Sync {
    /// Drop the app back to the unauthenticated presentation state.
    fn force_logout(&self);

    /// Present a blocking, dismissable notice.
    fn present_blocking_error(&self, message: &str);
}

/// Result of one gate check.
#[derive(Debug)]
pub enum GateOutcome {
    /// Backend reachable; reconciliation is running on the returned task.
    Healthy(JoinHandle<PassOutcome>),
    /// Backend unreachable; the shell has been signalled.
    Unhealthy,
}

/// Pre-flight gate in front of the reconciliation engine.
pub struct HealthGate {
    api: Arc<dyn ChallengeApi>,
    shell: Arc<dyn SessionShell>,
    engine: Arc<ReconcileEngine>,
}

impl HealthGate {
    pub fn new(
        api: Arc<dyn ChallengeApi>,
        shell: Arc<dyn SessionShell>,
        engine: Arc<ReconcileEngine>,
    ) -> Self {
        Self { api, shell, engine }
    }

    /// Probe the backend and, if healthy, kick off a reconciliation pass.
    pub async fn check_and_sync(&self) -> GateOutcome {
        match self.api.health_check().await {
            Err(error) => {
                tracing::warn!(error = %error, "Challenge backend health check failed");
                self.shell.force_logout();
                self.shell.present_blocking_error(UNREACHABLE_NOTICE);
                GateOutcome::Unhealthy
            }
            Ok(response) => {
                tracing::debug!(status = response.status, "Challenge backend healthy");
                let engine = self.engine.clone();
                GateOutcome::Healthy(tokio::spawn(async move { engine.run_pass().await }))
            }
        }
    }
}

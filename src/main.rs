// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Steps-Sync agent
//!
//! Reconciles on-device step records with the challenge backend: probes the
//! backend first, then runs one reconciliation pass in the background and
//! waits for it before exiting.

use std::sync::Arc;

use steps_sync::{
    config::Config,
    error::AppError,
    providers::{FitbitProvider, HealthKitProvider, ProviderRegistry},
    services::{
        ChallengeApi, ChallengeClient, GateOutcome, HealthGate, ReconcileEngine, SessionShell,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Shell collaborator for the headless agent: UI signals become log lines
/// plus a console notice.
struct ConsoleShell;

impl SessionShell for ConsoleShell {
    fn force_logout(&self) {
        tracing::warn!("Session invalidated, re-authentication required");
    }

    fn present_blocking_error(&self, message: &str) {
        eprintln!("{message}");
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(server = %config.server_url, fbid = %config.fbid, "Starting steps-sync");

    let api: Arc<dyn ChallengeApi> = Arc::new(ChallengeClient::new(config.server_url.clone()));

    let providers = ProviderRegistry::new(
        Arc::new(HealthKitProvider::new(&config.step_samples_path)),
        Arc::new(FitbitProvider::new(config.fitbit_access_token.clone())),
    );

    let engine = Arc::new(ReconcileEngine::new(
        api.clone(),
        providers,
        config.fbid.clone(),
        config.pedometer_source,
    ));

    let gate = HealthGate::new(api, Arc::new(ConsoleShell), engine);

    match gate.check_and_sync().await {
        GateOutcome::Unhealthy => Err(anyhow::anyhow!("challenge backend is unreachable").into()),
        GateOutcome::Healthy(pass) => {
            match pass.await {
                Ok(outcome) => {
                    tracing::info!(outcome = ?outcome, "Reconciliation pass finished");
                }
                Err(error) => {
                    tracing::warn!(error = %error, "Reconciliation task aborted");
                }
            }
            Ok(())
        }
    }
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("steps_sync=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}

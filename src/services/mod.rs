// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod challenge;
pub mod health;
pub mod reconcile;

pub use challenge::{ChallengeApi, ChallengeClient};
pub use health::{GateOutcome, HealthGate, SessionShell};
pub use reconcile::{PassOutcome, ReconcileEngine};

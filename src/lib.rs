// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Steps-Sync: reconcile on-device step records with the challenge backend
//!
//! This crate implements the step-record reconciliation core of a charity
//! walking challenge: it decides which on-device pedometer source may
//! supply activity data, computes the interval missing on the backend,
//! queries the source for a step count, and submits the resulting record,
//! all gated behind a connectivity health check.

pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod services;
pub mod time_utils;

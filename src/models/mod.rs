// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models decoded from challenge backend responses.
//!
//! Every model exposes a failable `from_json` constructor over the
//! loosely-typed payloads the backend returns. Callers treat a `None` the
//! same as "not found"; decode failure and absence are never distinguished.

pub mod event;
pub mod participant;
pub mod record;
pub mod source;
pub mod team;

pub use event::{ChallengePhase, Event};
pub use participant::Participant;
pub use record::Record;
pub use source::Source;
pub use team::Team;

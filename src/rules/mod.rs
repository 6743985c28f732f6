//! Match rules: flip acceptance, pair resolution and scoring.
//!
//! The engine is time-agnostic. It reports when a pair is complete and the
//! caller decides when to apply `resolve`.

pub mod engine;

pub use engine::{FlipResult, MatchEngine, PendingPair, RejectReason, Resolution};

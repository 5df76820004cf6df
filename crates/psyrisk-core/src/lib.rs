//! Scoring and aggregation engine for workplace psychosocial risk surveys.
//!
//! Raw questionnaire answers flow through [`scoring::ScoringEngine`], which
//! normalizes items, aggregates dimensions, builds composite indices and the
//! productivity-loss estimate, and assembles immutable report records. The
//! [`intake`] module adapts exported CSV sheets into engine input and
//! [`router`] exposes the engine over HTTP.

pub mod config;
pub mod error;
pub mod intake;
pub mod router;
pub mod scoring;
pub mod telemetry;

use chrono::{DateTime, TimeZone, Utc};

use crate::scoring::config::fixtures::sample_config;
use crate::scoring::{PayrollField, ResponseRow, ScoringEngine};

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(sample_config())
}

pub(super) fn processed_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 14, 0, 0).unwrap()
}

/// Row answering every item of the sample configuration.
pub(super) fn complete_row(source_id: &str) -> ResponseRow {
    ResponseRow::new(source_id)
        .with_answer("R1a", 5.0)
        .with_answer("R1b", 3.0)
        .with_answer("R2a", 2.0)
        .with_answer("G1", 4.0)
        .with_answer("G2", 2.0)
        .with_answer("M1", 4.0)
        .with_answer("M2", 5.0)
        .with_payroll(PayrollField::Amount(200_000.0))
}

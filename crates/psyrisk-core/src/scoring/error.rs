use std::path::PathBuf;

use super::domain::{DimensionGroup, DimensionId, ItemId};

/// Per-record failures. A record that hits one of these is excluded from its
/// batch; the rest of the batch is unaffected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("answer {value} for item {item} is outside the answer scale {min}..={max}")]
    OutOfRangeInput {
        item: ItemId,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("dimension {dimension} has no answered items")]
    InsufficientData { dimension: DimensionId },
    #[error("payroll must be a positive amount (got '{value}')")]
    InvalidPayroll { value: String },
    #[error("unit {unit} has {respondents} respondent(s), fewer than the minimum of {minimum}")]
    InsufficientSample {
        unit: String,
        respondents: usize,
        minimum: usize,
    },
}

impl ScoringError {
    /// Stable identifier used in exclusion listings.
    pub const fn kind(&self) -> &'static str {
        match self {
            ScoringError::OutOfRangeInput { .. } => "out_of_range_input",
            ScoringError::InsufficientData { .. } => "insufficient_data",
            ScoringError::InvalidPayroll { .. } => "invalid_payroll",
            ScoringError::InsufficientSample { .. } => "insufficient_sample",
        }
    }
}

/// Startup failures of the scoring configuration. The engine never runs
/// with a configuration that produced one of these.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("failed to read scoring configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("scoring configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("answer scale must be finite with min < max (got {min}..{max})")]
    InvalidScale { min: f64, max: f64 },
    #[error("item {item} references unknown dimension {dimension}")]
    UnknownDimension { item: ItemId, dimension: DimensionId },
    #[error("item {item} uses unknown weight level '{level}'")]
    UnknownWeightLevel { item: ItemId, level: String },
    #[error("{subject} weight must be a positive number (got {weight})")]
    InvalidWeight { subject: String, weight: f64 },
    #[error("dimension {dimension} has no configured items")]
    EmptyDimension { dimension: DimensionId },
    #[error("no {group} dimensions configured")]
    EmptyGroup { group: DimensionGroup },
    #[error("{group} dimension weights sum to {sum:.6}, expected 1")]
    WeightSum { group: DimensionGroup, sum: f64 },
    #[error("dimension {dimension} cap {cap} is outside 0..=100")]
    InvalidCap { dimension: DimensionId, cap: f64 },
    #[error("{name} bands are invalid: {reason}")]
    InvalidBands { name: &'static str, reason: String },
    #[error("loss mapping is invalid: {0}")]
    InvalidLossMapping(String),
    #[error("indicator {id} is invalid: {reason}")]
    InvalidIndicator { id: String, reason: String },
    #[error("sample rules are invalid: {0}")]
    InvalidSample(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable_identifiers() {
        let out_of_range = ScoringError::OutOfRangeInput {
            item: ItemId::from("R1"),
            value: 7.0,
            min: 1.0,
            max: 5.0,
        };
        assert_eq!(out_of_range.kind(), "out_of_range_input");
        assert_eq!(
            ScoringError::InsufficientData {
                dimension: DimensionId::from("R2")
            }
            .kind(),
            "insufficient_data"
        );
        assert_eq!(
            ScoringError::InvalidPayroll {
                value: "0".to_string()
            }
            .kind(),
            "invalid_payroll"
        );
        assert_eq!(
            ScoringError::InsufficientSample {
                unit: "RH".to_string(),
                respondents: 1,
                minimum: 2
            }
            .kind(),
            "insufficient_sample"
        );
        assert!(out_of_range.to_string().contains("R1"));
    }
}

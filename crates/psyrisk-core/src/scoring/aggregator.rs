use super::domain::DimensionId;
use super::error::ScoringError;

/// Normalized item score paired with its configured weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedScore {
    pub normalized: f64,
    pub weight: f64,
}

/// Weighted average of the answered items of one dimension.
///
/// Missing items are simply absent from `scores`, so they drop out of the
/// weight sum. A dimension with nothing answered is `InsufficientData`; it is
/// never scored as zero.
pub fn aggregate_dimension(
    dimension: &DimensionId,
    scores: &[WeightedScore],
    cap_score: Option<f64>,
) -> Result<f64, ScoringError> {
    let weight_sum: f64 = scores.iter().map(|entry| entry.weight).sum();
    if scores.is_empty() || weight_sum <= 0.0 {
        return Err(ScoringError::InsufficientData {
            dimension: dimension.clone(),
        });
    }

    let weighted: f64 = scores
        .iter()
        .map(|entry| entry.normalized * entry.weight)
        .sum();
    let score = weighted / weight_sum;

    Ok(match cap_score {
        Some(cap) => score.min(cap),
        None => score,
    })
}

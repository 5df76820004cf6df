use serde::Serialize;

use super::config::SampleConfig;

/// How much weight a record's figures can carry given who answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceReason {
    SmallSample,
    ModerateSample,
    NoWorkforce,
    NoManagement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleConfidence {
    pub level: ConfidenceLevel,
    pub reasons: Vec<ConfidenceReason>,
}

/// Respondents behind a record, split by declared role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleCounts {
    pub total: usize,
    pub workforce: usize,
    pub management: usize,
}

impl RoleCounts {
    fn has_roles(&self) -> bool {
        self.workforce + self.management > 0
    }
}

/// Confidence from the sample size and its role mix. Role rules only apply
/// when at least one respondent declared a profile.
pub fn assess_confidence(counts: &RoleCounts, rules: &SampleConfig) -> SampleConfidence {
    let mut reasons = Vec::new();
    let mut level = ConfidenceLevel::High;

    if counts.total < rules.low_confidence_below {
        level = ConfidenceLevel::Low;
        reasons.push(ConfidenceReason::SmallSample);
    } else if counts.total < rules.moderate_confidence_below {
        level = ConfidenceLevel::Medium;
        reasons.push(ConfidenceReason::ModerateSample);
    }

    if counts.has_roles() {
        if counts.workforce == 0 {
            level = ConfidenceLevel::Low;
            reasons.push(ConfidenceReason::NoWorkforce);
        }
        if counts.management == 0 {
            level = level.min(ConfidenceLevel::Medium);
            reasons.push(ConfidenceReason::NoManagement);
        }
    }

    SampleConfidence { level, reasons }
}

/// Payroll figures behind the loss estimate and how far the reported
/// amounts disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayrollSummary {
    pub samples: usize,
    /// Unreadable or non-positive answers left out of the median.
    pub discarded: usize,
    pub median: Option<f64>,
    /// `(max - min) / min` over the valid samples; needs two of them.
    pub divergence_ratio: Option<f64>,
    pub divergent: bool,
}

impl PayrollSummary {
    pub fn from_samples(mut samples: Vec<f64>, discarded: usize, alert_ratio: f64) -> Self {
        samples.sort_by(f64::total_cmp);
        let divergence_ratio = match (samples.first(), samples.last()) {
            (Some(&low), Some(&high)) if samples.len() >= 2 && low > 0.0 => {
                Some((high - low) / low)
            }
            _ => None,
        };

        Self {
            samples: samples.len(),
            discarded,
            median: median(&samples),
            divergence_ratio,
            divergent: divergence_ratio.is_some_and(|ratio| ratio > alert_ratio),
        }
    }
}

fn median(sorted: &[f64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let middle = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[middle - 1] + sorted[middle]) / 2.0
    } else {
        sorted[middle]
    })
}

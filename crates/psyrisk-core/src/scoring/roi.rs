use std::collections::BTreeMap;

use serde::Serialize;

use super::composite::CompositeIndices;
use super::config::{Bands, LossBreakpoint, RoiConfig};
use super::error::{ConfigurationError, ScoringError};

const MONTHS_PER_YEAR: f64 = 12.0;
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Validated mapping from risk/impact severity to a productivity-loss
/// fraction. Encodes business assumptions, so every number comes from
/// configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LossModel {
    risk_weight: f64,
    impact_weight: f64,
    curve: Vec<LossBreakpoint>,
    maturity_factors: BTreeMap<String, f64>,
    max_loss_fraction: f64,
    recoverable_factor: f64,
}

impl LossModel {
    pub(crate) fn from_config(
        config: RoiConfig,
        maturity_bands: &Bands,
    ) -> Result<Self, ConfigurationError> {
        let invalid = ConfigurationError::InvalidLossMapping;

        let RoiConfig {
            risk_weight,
            impact_weight,
            curve,
            maturity_factors,
            max_loss_fraction,
            recoverable_factor,
        } = config;

        for weight in [risk_weight, impact_weight] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid(format!("severity weight {weight} must be >= 0")));
            }
        }
        if (risk_weight + impact_weight - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(invalid(format!(
                "risk_weight + impact_weight must be 1 (got {})",
                risk_weight + impact_weight
            )));
        }

        if curve.is_empty() {
            return Err(invalid("curve needs at least one breakpoint".to_string()));
        }
        for point in &curve {
            if !(0.0..=100.0).contains(&point.severity) {
                return Err(invalid(format!(
                    "breakpoint severity {} is outside 0..=100",
                    point.severity
                )));
            }
            if !(0.0..=1.0).contains(&point.loss_fraction) {
                return Err(invalid(format!(
                    "breakpoint loss fraction {} is outside 0..=1",
                    point.loss_fraction
                )));
            }
        }
        for pair in curve.windows(2) {
            if pair[1].severity <= pair[0].severity {
                return Err(invalid("breakpoint severities must increase".to_string()));
            }
            if pair[1].loss_fraction < pair[0].loss_fraction {
                return Err(invalid(
                    "loss fractions must not decrease as severity grows".to_string(),
                ));
            }
        }

        for (label, factor) in &maturity_factors {
            if !maturity_bands.contains_label(label) {
                return Err(invalid(format!(
                    "maturity factor given for unknown band '{label}'"
                )));
            }
            if !factor.is_finite() || *factor < 0.0 {
                return Err(invalid(format!(
                    "maturity factor for '{label}' must be >= 0 (got {factor})"
                )));
            }
        }

        if !(max_loss_fraction > 0.0 && max_loss_fraction <= 1.0) {
            return Err(invalid(format!(
                "max_loss_fraction {max_loss_fraction} must be within (0, 1]"
            )));
        }
        if !(0.0..=1.0).contains(&recoverable_factor) {
            return Err(invalid(format!(
                "recoverable_factor {recoverable_factor} must be within 0..=1"
            )));
        }

        Ok(Self {
            risk_weight,
            impact_weight,
            curve,
            maturity_factors,
            max_loss_fraction,
            recoverable_factor,
        })
    }

    pub fn severity(&self, risk_index: f64, impact_index: f64) -> f64 {
        (self.risk_weight * risk_index + self.impact_weight * impact_index).clamp(0.0, 100.0)
    }

    /// Piecewise-linear interpolation over the breakpoints; severities past
    /// either end clamp to that end's fraction.
    pub fn loss_fraction(&self, severity: f64) -> f64 {
        let first = self.curve[0];
        if severity <= first.severity {
            return first.loss_fraction;
        }

        for pair in self.curve.windows(2) {
            let (low, high) = (pair[0], pair[1]);
            if severity <= high.severity {
                let position = (severity - low.severity) / (high.severity - low.severity);
                return low.loss_fraction + position * (high.loss_fraction - low.loss_fraction);
            }
        }

        self.curve[self.curve.len() - 1].loss_fraction
    }

    pub fn maturity_factor(&self, band: &str) -> f64 {
        self.maturity_factors.get(band).copied().unwrap_or(1.0)
    }

    pub fn max_loss_fraction(&self) -> f64 {
        self.max_loss_fraction
    }

    pub fn recoverable_factor(&self) -> f64 {
        self.recoverable_factor
    }
}

/// `payroll × loss_fraction`. Payroll must be a positive finite amount.
pub fn estimate_loss(payroll: f64, loss_fraction: f64) -> Result<f64, ScoringError> {
    if !payroll.is_finite() || payroll <= 0.0 {
        return Err(ScoringError::InvalidPayroll {
            value: payroll.to_string(),
        });
    }

    Ok(payroll * loss_fraction.max(0.0))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoiEstimate {
    pub payroll_monthly: f64,
    pub severity: f64,
    pub base_loss_fraction: f64,
    pub maturity_factor: f64,
    pub loss_fraction: f64,
    pub monthly_loss: f64,
    pub annual_loss: f64,
    pub recoverable_factor: f64,
    pub recoverable_value: f64,
}

pub struct RoiEstimator<'a> {
    model: &'a LossModel,
}

impl<'a> RoiEstimator<'a> {
    pub fn new(model: &'a LossModel) -> Self {
        Self { model }
    }

    pub fn estimate(
        &self,
        payroll_monthly: f64,
        indices: &CompositeIndices,
    ) -> Result<RoiEstimate, ScoringError> {
        let severity = self.model.severity(indices.risk.score, indices.impact.score);
        let base_loss_fraction = self.model.loss_fraction(severity);
        let maturity_factor = self.model.maturity_factor(&indices.maturity.band);
        let loss_fraction = (base_loss_fraction * maturity_factor).min(self.model.max_loss_fraction());

        let monthly_loss = estimate_loss(payroll_monthly, loss_fraction)?;
        let annual_loss = monthly_loss * MONTHS_PER_YEAR;
        let recoverable_factor = self.model.recoverable_factor();

        Ok(RoiEstimate {
            payroll_monthly,
            severity,
            base_loss_fraction,
            maturity_factor,
            loss_fraction,
            monthly_loss,
            annual_loss,
            recoverable_factor,
            recoverable_value: annual_loss * recoverable_factor,
        })
    }
}

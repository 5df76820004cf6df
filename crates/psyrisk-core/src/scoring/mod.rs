//! Scoring pipeline: item normalization, dimension aggregation, composite
//! indices, productivity-loss estimate and report assembly.
//!
//! Records are scored independently. A failure on one record turns into a
//! [`RecordExclusion`] for that record and never touches the rest of the batch.

pub mod aggregator;
pub mod composite;
pub mod config;
pub mod domain;
pub mod error;
pub mod normalizer;
pub mod report;
pub mod roi;
pub mod sample;

#[cfg(test)]
mod tests;

pub use composite::{
    CompositeIndices, CriticalCombination, DerivedIndex, Diagnosis, GapEntry, IndexScore,
    MaturityIndex, Priority,
};
pub use config::{
    AnswerScale, Band, Condition, IndexSource, OutOfRangePolicy, SampleConfig, ScoringConfig,
    ScoringConfigFile,
};
pub use domain::{
    DimensionGroup, DimensionId, DimensionScore, ItemId, ItemScore, PayrollField, RespondentRole,
    ResponseRow,
};
pub use error::{ConfigurationError, ScoringError};
pub use report::{BatchReport, RecordExclusion, ReportMetadata, ReportRecord};
pub use roi::RoiEstimate;
pub use sample::{ConfidenceLevel, ConfidenceReason, PayrollSummary, SampleConfidence};

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use aggregator::{aggregate_dimension, WeightedScore};
use composite::CompositeScorer;
use normalizer::{admit_answer, normalize_answer};
use report::{RecordParts, ReportAssembler};
use roi::RoiEstimator;
use sample::{assess_confidence, RoleCounts};

/// Unit label for rows that did not name one.
pub const UNASSIGNED_UNIT: &str = "unassigned";

/// Whether a batch yields one record per row or one per organizational unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    #[default]
    Respondent,
    Unit,
}

struct Subject {
    source_id: String,
    unit: Option<String>,
    source_rows: Vec<String>,
    roles: RoleCounts,
    maturity_raters: usize,
    payroll: PayrollSummary,
}

/// Stateless scorer over a validated configuration.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score a single respondent's row.
    pub fn score_respondent(
        &self,
        row: &ResponseRow,
        processed_at: DateTime<Utc>,
    ) -> Result<ReportRecord, ScoringError> {
        let mut answers = BTreeMap::new();
        for (item, raw) in self.configured_answers(row) {
            answers.insert(item.clone(), self.admit(item, raw)?);
        }
        let payroll = payroll_amount(&row.payroll)?;

        let subject = Subject {
            source_id: row.source_id.clone(),
            unit: row.unit.clone(),
            source_rows: vec![row.source_id.clone()],
            roles: role_counts([row]),
            maturity_raters: 1,
            payroll: PayrollSummary::from_samples(
                payroll.into_iter().collect(),
                0,
                self.config.sample().payroll_divergence_alert,
            ),
        };
        self.score_answers(subject, &answers, processed_at)
    }

    /// Score an organizational unit: each item's raw answers are averaged
    /// across the unit's rows before normalization, and the payroll is the
    /// median of the readable positive amounts reported.
    ///
    /// When the unit has management respondents, only their answers feed
    /// the maturity dimensions.
    pub fn score_unit(
        &self,
        unit: &str,
        rows: &[ResponseRow],
        processed_at: DateTime<Utc>,
    ) -> Result<ReportRecord, ScoringError> {
        self.score_pooled(unit, rows.iter(), processed_at)
    }

    /// Score every row (or unit) independently, collecting failures as
    /// exclusions instead of aborting.
    pub fn score_batch(
        &self,
        rows: &[ResponseRow],
        mode: ScoringMode,
        processed_at: DateTime<Utc>,
    ) -> BatchReport {
        let mut records = Vec::new();
        let mut exclusions = Vec::new();
        let mut settle = |source_id: &str, outcome: Result<ReportRecord, ScoringError>| match outcome {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(source_id, kind = err.kind(), "record excluded from batch: {err}");
                exclusions.push(RecordExclusion::new(source_id, &err));
            }
        };

        match mode {
            ScoringMode::Respondent => {
                for row in rows {
                    settle(&row.source_id, self.score_respondent(row, processed_at));
                }
            }
            ScoringMode::Unit => {
                let mut units: BTreeMap<&str, Vec<&ResponseRow>> = BTreeMap::new();
                for row in rows {
                    let unit = row.unit.as_deref().unwrap_or(UNASSIGNED_UNIT);
                    units.entry(unit).or_default().push(row);
                }
                for (unit, members) in units {
                    settle(unit, self.score_pooled(unit, members, processed_at));
                }
            }
        }

        info!(
            ?mode,
            records = records.len(),
            excluded = exclusions.len(),
            "scored response batch"
        );

        BatchReport {
            generated_at: processed_at,
            records,
            exclusions,
        }
    }

    fn score_pooled<'r>(
        &self,
        unit: &str,
        rows: impl IntoIterator<Item = &'r ResponseRow>,
        processed_at: DateTime<Utc>,
    ) -> Result<ReportRecord, ScoringError> {
        let members: Vec<&ResponseRow> = rows.into_iter().collect();
        let minimum = self.config.sample().min_unit_respondents;
        if members.len() < minimum {
            return Err(ScoringError::InsufficientSample {
                unit: unit.to_string(),
                respondents: members.len(),
                minimum,
            });
        }

        let management_rated = members
            .iter()
            .any(|row| row.role == Some(RespondentRole::Management));
        let mut pooled: BTreeMap<ItemId, Vec<f64>> = BTreeMap::new();
        let mut maturity_raters = 0;
        let mut payrolls = Vec::new();
        let mut discarded = 0;
        let mut payroll_error = None;
        let mut source_rows = Vec::with_capacity(members.len());

        for row in &members {
            let rates_maturity =
                !management_rated || row.role == Some(RespondentRole::Management);
            if rates_maturity {
                maturity_raters += 1;
            }

            for (item, raw) in self.configured_answers(row) {
                if !rates_maturity && self.config.group_of(item) == Some(DimensionGroup::Maturity) {
                    continue;
                }
                let admitted = self.admit(item, raw)?;
                pooled.entry(item.clone()).or_default().push(admitted);
            }

            match payroll_amount(&row.payroll) {
                Ok(Some(amount)) => payrolls.push(amount),
                Ok(None) => {}
                Err(err) => {
                    discarded += 1;
                    payroll_error.get_or_insert(err);
                }
            }
            source_rows.push(row.source_id.clone());
        }

        if payrolls.is_empty() {
            if let Some(err) = payroll_error {
                return Err(err);
            }
        }
        if discarded > 0 {
            warn!(unit, discarded, "left unreadable payroll answers out of the unit median");
        }

        let answers = pooled
            .into_iter()
            .map(|(item, values)| {
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                (item, mean)
            })
            .collect();

        let subject = Subject {
            source_id: unit.to_string(),
            unit: Some(unit.to_string()),
            source_rows,
            roles: role_counts(members.iter().copied()),
            maturity_raters,
            payroll: PayrollSummary::from_samples(
                payrolls,
                discarded,
                self.config.sample().payroll_divergence_alert,
            ),
        };
        self.score_answers(subject, &answers, processed_at)
    }

    fn configured_answers<'r>(
        &'r self,
        row: &'r ResponseRow,
    ) -> impl Iterator<Item = (&'r ItemId, f64)> + 'r {
        row.answers
            .iter()
            .filter(move |(item, _)| self.config.item(item).is_some())
            .map(|(item, raw)| (item, *raw))
    }

    fn admit(&self, item: &ItemId, raw: f64) -> Result<f64, ScoringError> {
        admit_answer(item, raw, self.config.scale(), self.config.out_of_range())
    }

    fn score_answers(
        &self,
        subject: Subject,
        answers: &BTreeMap<ItemId, f64>,
        processed_at: DateTime<Utc>,
    ) -> Result<ReportRecord, ScoringError> {
        let scale = self.config.scale();
        let policy = self.config.out_of_range();
        let mut items = Vec::new();
        let mut dimensions = Vec::new();

        for (dimension_id, rule) in self.config.dimensions() {
            let mut weighted = Vec::with_capacity(rule.items.len());

            for item_id in &rule.items {
                let (Some(&raw), Some(item_rule)) = (answers.get(item_id), self.config.item(item_id))
                else {
                    continue;
                };
                let normalized = normalize_answer(item_id, raw, scale, item_rule.invert, policy)?;
                weighted.push(WeightedScore {
                    normalized,
                    weight: item_rule.weight,
                });
                items.push(ItemScore {
                    item: item_id.clone(),
                    group: rule.group,
                    dimension: dimension_id.clone(),
                    raw,
                    normalized,
                    weight: item_rule.weight,
                    inverted: item_rule.invert,
                });
            }

            let score = aggregate_dimension(dimension_id, &weighted, rule.cap_score)?;
            dimensions.push(DimensionScore {
                dimension: dimension_id.clone(),
                name: rule.name.clone(),
                group: rule.group,
                score,
                status: self.config.bands_for(rule.group).classify(score).label.clone(),
                items_used: weighted.len(),
                items_expected: rule.items.len(),
            });
        }

        let scorer = CompositeScorer::new(&self.config);
        let indices = scorer.score(&dimensions)?;
        let diagnosis = scorer.diagnose(&dimensions);
        let gaps = scorer.gap_analysis(&dimensions, indices.maturity.score);
        let derived_indices = scorer.derived_indices(&dimensions, &indices, &gaps);
        let combinations = scorer.critical_combinations(&dimensions, &indices.maturity);
        let confidence = assess_confidence(&subject.roles, self.config.sample());
        let roi = subject
            .payroll
            .median
            .map(|amount| RoiEstimator::new(self.config.loss_model()).estimate(amount, &indices))
            .transpose()?;

        if subject.payroll.divergent {
            warn!(
                source_id = %subject.source_id,
                ratio = subject.payroll.divergence_ratio,
                "reported payroll amounts diverge; validate before using the loss estimate"
            );
        }

        debug!(
            source_id = %subject.source_id,
            risk = indices.risk.score,
            impact = indices.impact.score,
            maturity = %indices.maturity.band,
            combinations = combinations.len(),
            "scored record"
        );

        Ok(ReportAssembler::new(processed_at).assemble(RecordParts {
            source_id: subject.source_id,
            unit: subject.unit,
            source_rows: subject.source_rows,
            roles: subject.roles,
            maturity_raters: subject.maturity_raters,
            items,
            dimensions,
            indices,
            derived_indices,
            diagnosis,
            combinations,
            gaps,
            confidence,
            payroll: subject.payroll,
            roi,
        }))
    }
}

fn payroll_amount(field: &PayrollField) -> Result<Option<f64>, ScoringError> {
    match field {
        PayrollField::Missing => Ok(None),
        PayrollField::Amount(amount) if amount.is_finite() && *amount > 0.0 => Ok(Some(*amount)),
        PayrollField::Amount(amount) => Err(ScoringError::InvalidPayroll {
            value: amount.to_string(),
        }),
        PayrollField::Unreadable(raw) => Err(ScoringError::InvalidPayroll { value: raw.clone() }),
    }
}

fn role_counts<'r>(rows: impl IntoIterator<Item = &'r ResponseRow>) -> RoleCounts {
    rows.into_iter().fold(RoleCounts::default(), |mut counts, row| {
        counts.total += 1;
        match row.role {
            Some(RespondentRole::Workforce) => counts.workforce += 1,
            Some(RespondentRole::Management) => counts.management += 1,
            None => {}
        }
        counts
    })
}

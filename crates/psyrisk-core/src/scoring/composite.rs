use serde::Serialize;

use std::collections::BTreeMap;

use super::config::{Condition, IndexSource, ScoringConfig};
use super::domain::{DimensionGroup, DimensionId, DimensionScore};
use super::error::ScoringError;

/// Composite index on the 0-100 scale with its status label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexScore {
    pub score: f64,
    pub status: String,
}

/// Maturity composite with its ordered band label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaturityIndex {
    pub score: f64,
    pub band: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeIndices {
    pub risk: IndexScore,
    pub impact: IndexScore,
    pub maturity: MaturityIndex,
}

/// Urgency of intervention derived from the worst risk/impact status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const fn label(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnosis {
    pub general_risk_status: String,
    pub general_impact_status: String,
    pub priority: Priority,
    /// Risk dimensions, most severe first.
    pub risk_ranking: Vec<DimensionId>,
}

/// Distance between a risk dimension and the maturity composite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapEntry {
    pub dimension: DimensionId,
    pub risk_score: f64,
    pub maturity_score: f64,
    pub gap: f64,
    pub severity: String,
}

/// Configured indicator such as burnout or absenteeism risk, labelled with
/// the risk bands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedIndex {
    pub id: String,
    pub name: String,
    pub score: f64,
    pub status: String,
}

/// A configured combination whose conditions all held.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalCombination {
    pub id: String,
    pub description: String,
    /// Dimensions in their top band that satisfied the conditions.
    pub dimensions: Vec<DimensionId>,
}

/// Weighted combination of `(score, weight)` pairs.
///
/// Pairs are summed in a canonical order so the result is bit-for-bit
/// identical whatever order the caller supplies them in.
pub fn weighted_index(parts: &[(f64, f64)]) -> f64 {
    let mut ordered = parts.to_vec();
    ordered.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let weight_sum: f64 = ordered.iter().map(|(_, weight)| weight).sum();
    debug_assert!(weight_sum > 0.0, "composite weights must be positive");
    let total: f64 = ordered.iter().map(|(score, weight)| score * weight).sum();

    total / weight_sum
}

/// Combines dimension scores into the group indices and derived views.
pub struct CompositeScorer<'a> {
    config: &'a ScoringConfig,
}

impl<'a> CompositeScorer<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self { config }
    }

    /// Index for one group. Every configured dimension of the group must be
    /// present in `dimensions`.
    pub fn group_index(
        &self,
        group: DimensionGroup,
        dimensions: &[DimensionScore],
    ) -> Result<f64, ScoringError> {
        let parts = self
            .config
            .dimensions_in(group)
            .map(|(id, rule)| {
                dimensions
                    .iter()
                    .find(|score| &score.dimension == id)
                    .map(|score| (score.score, rule.weight))
                    .ok_or_else(|| ScoringError::InsufficientData {
                        dimension: id.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(weighted_index(&parts))
    }

    pub fn score(&self, dimensions: &[DimensionScore]) -> Result<CompositeIndices, ScoringError> {
        let risk = self.group_index(DimensionGroup::Risk, dimensions)?;
        let impact = self.group_index(DimensionGroup::Impact, dimensions)?;
        let maturity = self.group_index(DimensionGroup::Maturity, dimensions)?;

        Ok(CompositeIndices {
            risk: IndexScore {
                score: risk,
                status: self.config.risk_bands().classify(risk).label.clone(),
            },
            impact: IndexScore {
                score: impact,
                status: self.config.impact_bands().classify(impact).label.clone(),
            },
            maturity: MaturityIndex {
                score: maturity,
                band: self.config.maturity_bands().classify(maturity).label.clone(),
            },
        })
    }

    pub fn diagnose(&self, dimensions: &[DimensionScore]) -> Diagnosis {
        let worst_rank = |group: DimensionGroup| {
            let bands = self.config.bands_for(group);
            dimensions
                .iter()
                .filter(|score| score.group == group)
                .map(|score| bands.rank_of(score.score))
                .max()
                .unwrap_or(0)
        };

        let risk_bands = self.config.risk_bands();
        let impact_bands = self.config.impact_bands();
        let risk_rank = worst_rank(DimensionGroup::Risk);
        let impact_rank = worst_rank(DimensionGroup::Impact);

        let at_top = (risk_rank > 0 && risk_rank >= risk_bands.top_rank())
            || (impact_rank > 0 && impact_rank >= impact_bands.top_rank());
        let priority = if at_top {
            Priority::High
        } else if risk_rank > 0 || impact_rank > 0 {
            Priority::Medium
        } else {
            Priority::Low
        };

        let mut ranked: Vec<&DimensionScore> = dimensions
            .iter()
            .filter(|score| score.group == DimensionGroup::Risk)
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.dimension.cmp(&b.dimension))
        });

        Diagnosis {
            general_risk_status: risk_bands.label_at(risk_rank).to_string(),
            general_impact_status: impact_bands.label_at(impact_rank).to_string(),
            priority,
            risk_ranking: ranked.into_iter().map(|score| score.dimension.clone()).collect(),
        }
    }

    pub fn gap_analysis(&self, dimensions: &[DimensionScore], maturity_score: f64) -> Vec<GapEntry> {
        dimensions
            .iter()
            .filter(|score| score.group == DimensionGroup::Risk)
            .map(|score| {
                let gap = score.score - maturity_score;
                GapEntry {
                    dimension: score.dimension.clone(),
                    risk_score: score.score,
                    maturity_score,
                    gap,
                    severity: self.config.gap_bands().classify(gap).label.clone(),
                }
            })
            .collect()
    }

    /// Evaluates the configured derived indices in declaration order. Each
    /// index is the weighted sum of its terms.
    pub fn derived_indices(
        &self,
        dimensions: &[DimensionScore],
        indices: &CompositeIndices,
        gaps: &[GapEntry],
    ) -> Vec<DerivedIndex> {
        let mut computed: BTreeMap<&str, f64> = BTreeMap::new();
        let mut derived = Vec::with_capacity(self.config.derived_indices().len());

        for index in self.config.derived_indices() {
            let score: f64 = index
                .terms
                .iter()
                .map(|term| {
                    let value = match &term.source {
                        IndexSource::Dimension(id) => dimension_score(dimensions, id),
                        IndexSource::GroupMean(group) => group_mean(dimensions, *group),
                        IndexSource::Group(group) => match group {
                            DimensionGroup::Risk => indices.risk.score,
                            DimensionGroup::Impact => indices.impact.score,
                            DimensionGroup::Maturity => indices.maturity.score,
                        },
                        IndexSource::Index(id) => {
                            computed.get(id.as_str()).copied().unwrap_or(0.0)
                        }
                        IndexSource::Gap(id) => gaps
                            .iter()
                            .find(|entry| &entry.dimension == id)
                            .map_or(0.0, |entry| entry.gap.max(0.0)),
                    };
                    value * term.weight
                })
                .sum();

            computed.insert(index.id.as_str(), score);
            derived.push(DerivedIndex {
                id: index.id.clone(),
                name: index.name.clone(),
                score,
                status: self.config.risk_bands().classify(score).label.clone(),
            });
        }

        derived
    }

    /// Configured combinations whose every condition holds.
    pub fn critical_combinations(
        &self,
        dimensions: &[DimensionScore],
        maturity: &MaturityIndex,
    ) -> Vec<CriticalCombination> {
        let critical: Vec<&DimensionScore> = dimensions
            .iter()
            .filter(|score| {
                let bands = self.config.bands_for(score.group);
                let rank = bands.rank_of(score.score);
                rank > 0 && rank == bands.top_rank()
            })
            .collect();
        let maturity_bands = self.config.maturity_bands();
        let maturity_rank = maturity_bands.rank_of(maturity.score);

        self.config
            .combinations()
            .iter()
            .filter_map(|combination| {
                let mut triggered: Vec<DimensionId> = Vec::new();
                for condition in &combination.when {
                    let matched: Vec<DimensionId> = match condition {
                        Condition::AnyCritical(group) => critical
                            .iter()
                            .filter(|score| score.group == *group)
                            .map(|score| score.dimension.clone())
                            .collect(),
                        Condition::Critical(ids) => critical
                            .iter()
                            .filter(|score| ids.contains(&score.dimension))
                            .map(|score| score.dimension.clone())
                            .collect(),
                        Condition::MaturityBelow(label) => {
                            let below = maturity_bands
                                .rank_of_label(label)
                                .is_some_and(|limit| maturity_rank < limit);
                            if !below {
                                return None;
                            }
                            continue;
                        }
                    };
                    if matched.is_empty() {
                        return None;
                    }
                    triggered.extend(matched);
                }

                triggered.sort();
                triggered.dedup();
                Some(CriticalCombination {
                    id: combination.id.clone(),
                    description: combination.description.clone(),
                    dimensions: triggered,
                })
            })
            .collect()
    }
}

fn dimension_score(dimensions: &[DimensionScore], id: &DimensionId) -> f64 {
    dimensions
        .iter()
        .find(|score| &score.dimension == id)
        .map_or(0.0, |score| score.score)
}

fn group_mean(dimensions: &[DimensionScore], group: DimensionGroup) -> f64 {
    let scores: Vec<f64> = dimensions
        .iter()
        .filter(|score| score.group == group)
        .map(|score| score.score)
        .collect();
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::config::fixtures::sample_config;
    use proptest::prelude::*;

    fn dimension(id: &str, group: DimensionGroup, score: f64) -> DimensionScore {
        DimensionScore {
            dimension: DimensionId::from(id),
            name: id.to_string(),
            group,
            score,
            status: String::new(),
            items_used: 1,
            items_expected: 1,
        }
    }

    fn sample_dimensions() -> Vec<DimensionScore> {
        vec![
            dimension("R1", DimensionGroup::Risk, 80.0),
            dimension("R2", DimensionGroup::Risk, 40.0),
            dimension("G", DimensionGroup::Impact, 30.0),
            dimension("M", DimensionGroup::Maturity, 55.0),
        ]
    }

    #[test]
    fn indices_combine_dimension_weights() {
        let config = sample_config();
        let indices = CompositeScorer::new(&config)
            .score(&sample_dimensions())
            .expect("indices");

        assert_eq!(indices.risk.score, 60.0);
        assert_eq!(indices.risk.status, "ATENCAO");
        assert_eq!(indices.impact.score, 30.0);
        assert_eq!(indices.impact.status, "OK");
        assert_eq!(indices.maturity.score, 55.0);
        assert_eq!(indices.maturity.band, "em desenvolvimento");
    }

    #[test]
    fn missing_dimension_blocks_the_index() {
        let config = sample_config();
        let mut dimensions = sample_dimensions();
        dimensions.retain(|score| score.dimension.as_str() != "R2");

        match CompositeScorer::new(&config).score(&dimensions) {
            Err(ScoringError::InsufficientData { dimension }) => {
                assert_eq!(dimension, DimensionId::from("R2"))
            }
            other => panic!("expected insufficient data, got {other:?}"),
        }
    }

    #[test]
    fn maturity_band_boundaries_belong_to_the_upper_band() {
        let config = sample_config();
        let scorer = CompositeScorer::new(&config);
        let mut dimensions = sample_dimensions();

        dimensions[3].score = 70.0;
        let indices = scorer.score(&dimensions).expect("indices");
        assert_eq!(indices.maturity.band, "consolidada");

        dimensions[3].score = 39.99;
        let indices = scorer.score(&dimensions).expect("indices");
        assert_eq!(indices.maturity.band, "inicial");
    }

    #[test]
    fn diagnosis_takes_the_worst_status() {
        let config = sample_config();
        let diagnosis = CompositeScorer::new(&config).diagnose(&sample_dimensions());

        assert_eq!(diagnosis.general_risk_status, "CRITICO");
        assert_eq!(diagnosis.general_impact_status, "OK");
        assert_eq!(diagnosis.priority, Priority::High);
        assert_eq!(
            diagnosis.risk_ranking,
            vec![DimensionId::from("R1"), DimensionId::from("R2")]
        );
    }

    #[test]
    fn diagnosis_is_low_priority_when_everything_is_ok() {
        let config = sample_config();
        let dimensions = vec![
            dimension("R1", DimensionGroup::Risk, 10.0),
            dimension("R2", DimensionGroup::Risk, 10.0),
            dimension("G", DimensionGroup::Impact, 39.0),
        ];
        let diagnosis = CompositeScorer::new(&config).diagnose(&dimensions);

        assert_eq!(diagnosis.priority, Priority::Low);
        assert_eq!(diagnosis.general_risk_status, "OK");
        assert_eq!(
            diagnosis.risk_ranking,
            vec![DimensionId::from("R1"), DimensionId::from("R2")]
        );
    }

    #[test]
    fn gap_analysis_classifies_distance_to_maturity() {
        let config = sample_config();
        let gaps = CompositeScorer::new(&config).gap_analysis(&sample_dimensions(), 55.0);

        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].dimension, DimensionId::from("R1"));
        assert_eq!(gaps[0].gap, 25.0);
        assert_eq!(gaps[0].severity, "ALTO");
        assert_eq!(gaps[1].gap, -15.0);
        assert_eq!(gaps[1].severity, "CONTROLADO");
    }

    #[test]
    fn impact_index_is_labelled_with_impact_bands() {
        let config = sample_config();
        let scorer = CompositeScorer::new(&config);
        let mut dimensions = sample_dimensions();
        dimensions[2].score = 50.0;

        let indices = scorer.score(&dimensions).expect("indices");
        assert_eq!(indices.impact.score, 50.0);
        assert_eq!(indices.impact.status, "OK");
        assert_eq!(scorer.diagnose(&dimensions).general_impact_status, "OK");

        dimensions[2].score = 60.0;
        let indices = scorer.score(&dimensions).expect("indices");
        assert_eq!(indices.impact.status, "ATENCAO");
    }

    #[test]
    fn impact_alone_in_its_top_band_raises_priority() {
        let config = sample_config();
        let dimensions = vec![
            dimension("R1", DimensionGroup::Risk, 10.0),
            dimension("R2", DimensionGroup::Risk, 10.0),
            dimension("G", DimensionGroup::Impact, 85.0),
        ];
        let diagnosis = CompositeScorer::new(&config).diagnose(&dimensions);

        assert_eq!(diagnosis.general_impact_status, "CRITICO");
        assert_eq!(diagnosis.priority, Priority::High);
    }

    #[test]
    fn derived_indices_mix_dimensions_groups_and_earlier_indices() {
        let config = sample_config();
        let scorer = CompositeScorer::new(&config);
        let dimensions = sample_dimensions();
        let indices = scorer.score(&dimensions).expect("indices");
        let gaps = scorer.gap_analysis(&dimensions, indices.maturity.score);

        let derived = scorer.derived_indices(&dimensions, &indices, &gaps);
        let ids: Vec<&str> = derived.iter().map(|index| index.id.as_str()).collect();
        assert_eq!(ids, vec!["BURNOUT", "ABUSE", "HARASSMENT"]);

        // 0.5 * 30 + 0.5 * 80
        assert!((derived[0].score - 55.0).abs() < 1e-9);
        assert_eq!(derived[0].status, "ATENCAO");
        // 0.4 * 40 + 0.3 * 80 + 0.3 * 55
        assert!((derived[1].score - 56.5).abs() < 1e-9);
        // R2 sits below maturity, so its gap adds nothing
        assert!((derived[2].score - 34.0).abs() < 1e-9);
        assert_eq!(derived[2].status, "OK");
    }

    #[test]
    fn positive_gap_feeds_the_derived_index() {
        let config = sample_config();
        let scorer = CompositeScorer::new(&config);
        let mut dimensions = sample_dimensions();
        dimensions[1].score = 90.0;
        let indices = scorer.score(&dimensions).expect("indices");
        let gaps = scorer.gap_analysis(&dimensions, indices.maturity.score);

        let derived = scorer.derived_indices(&dimensions, &indices, &gaps);
        let harassment = derived
            .iter()
            .find(|index| index.id == "HARASSMENT")
            .expect("configured");
        // 0.85 * 90 + 0.15 * (90 - 55)
        assert!((harassment.score - 81.75).abs() < 1e-9);
        assert_eq!(harassment.status, "CRITICO");
    }

    #[test]
    fn combinations_need_every_condition() {
        let config = sample_config();
        let scorer = CompositeScorer::new(&config);
        let dimensions = sample_dimensions();
        let indices = scorer.score(&dimensions).expect("indices");
        assert!(scorer
            .critical_combinations(&dimensions, &indices.maturity)
            .is_empty());

        let mut dimensions = sample_dimensions();
        dimensions[1].score = 75.0;
        dimensions[2].score = 85.0;
        let indices = scorer.score(&dimensions).expect("indices");
        let combinations = scorer.critical_combinations(&dimensions, &indices.maturity);

        let ids: Vec<&str> = combinations.iter().map(|found| found.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["RISK_X_IMPACT", "LEADERSHIP_CLIMATE", "LOW_READINESS_HIGH_RISK"]
        );
        assert_eq!(
            combinations[0].dimensions,
            vec![
                DimensionId::from("G"),
                DimensionId::from("R1"),
                DimensionId::from("R2")
            ]
        );
        assert_eq!(combinations[1].dimensions, vec![DimensionId::from("R2")]);
    }

    #[test]
    fn mature_organisations_skip_the_low_readiness_combination() {
        let config = sample_config();
        let scorer = CompositeScorer::new(&config);
        let mut dimensions = sample_dimensions();
        dimensions[1].score = 75.0;
        dimensions[3].score = 75.0;
        let indices = scorer.score(&dimensions).expect("indices");

        let ids: Vec<String> = scorer
            .critical_combinations(&dimensions, &indices.maturity)
            .into_iter()
            .map(|found| found.id)
            .collect();
        assert_eq!(ids, vec!["LEADERSHIP_CLIMATE".to_string()]);
    }

    #[test]
    fn composite_does_not_mask_out_of_scale_inputs() {
        assert_eq!(weighted_index(&[(250.0, 1.0)]), 250.0);
    }

    proptest! {
        #[test]
        fn composite_stays_between_its_inputs(
            parts in prop::collection::vec((0.0..=100.0f64, 0.01..10.0f64), 1..8)
        ) {
            let index = weighted_index(&parts);
            let lowest = parts.iter().map(|(score, _)| *score).fold(f64::INFINITY, f64::min);
            let highest = parts.iter().map(|(score, _)| *score).fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(index >= lowest - 1e-9 && index <= highest + 1e-9);
            prop_assert!((-1e-9..=100.0 + 1e-9).contains(&index));
        }

        #[test]
        fn composite_is_order_invariant(
            (original, shuffled) in prop::collection::vec((0.0..=100.0f64, 0.01..10.0f64), 1..8)
                .prop_flat_map(|parts| (Just(parts.clone()), Just(parts).prop_shuffle()))
        ) {
            prop_assert_eq!(weighted_index(&original), weighted_index(&shuffled));
        }
    }
}

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{DimensionGroup, DimensionId, ItemId};
use super::error::ConfigurationError;
use super::roi::LossModel;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Bounds of the answer scale, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnswerScale {
    pub min: f64,
    pub max: f64,
}

impl AnswerScale {
    pub const LIKERT_5: AnswerScale = AnswerScale { min: 1.0, max: 5.0 };

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    fn likert() -> Self {
        Self::LIKERT_5
    }
}

/// What to do with an answer outside the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfRangePolicy {
    #[default]
    Reject,
    Clamp,
}

/// Item weight given either as a number or as a named level (`"ALTO"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeightSpec {
    Value(f64),
    Level(String),
}

impl Default for WeightSpec {
    fn default() -> Self {
        WeightSpec::Value(1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemConfig {
    pub dimension: DimensionId,
    #[serde(default)]
    pub weight: WeightSpec,
    #[serde(default)]
    pub invert: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionConfig {
    pub name: String,
    pub group: DimensionGroup,
    /// Share of the group's composite index; weights of a group sum to 1.
    pub weight: f64,
    #[serde(default)]
    pub cap_score: Option<f64>,
}

/// Lower-bound-inclusive threshold of an ordered label set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub label: String,
    pub min: f64,
}

impl Band {
    pub fn new(label: &str, min: f64) -> Self {
        Self {
            label: label.to_string(),
            min,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossBreakpoint {
    pub severity: f64,
    pub loss_fraction: f64,
}

/// Business assumptions behind the productivity-loss estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiConfig {
    pub risk_weight: f64,
    pub impact_weight: f64,
    pub curve: Vec<LossBreakpoint>,
    #[serde(default)]
    pub maturity_factors: BTreeMap<String, f64>,
    #[serde(default = "default_max_loss_fraction")]
    pub max_loss_fraction: f64,
    #[serde(default)]
    pub recoverable_factor: f64,
}

fn default_max_loss_fraction() -> f64 {
    1.0
}

/// Input of one derived-index term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexSource {
    Dimension(DimensionId),
    /// Unweighted mean of the group's dimension scores.
    GroupMean(DimensionGroup),
    /// Weighted composite index of the group.
    Group(DimensionGroup),
    /// A derived index declared earlier in the list.
    Index(String),
    /// Positive part of a risk dimension's gap to maturity.
    Gap(DimensionId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedTerm {
    pub source: IndexSource,
    pub weight: f64,
}

/// Named risk indicator computed as a weighted sum of other scores.
/// Term weights sum to at most 1 so the result stays on the 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedIndexConfig {
    pub id: String,
    pub name: String,
    pub terms: Vec<DerivedTerm>,
}

/// One clause of a critical combination; every clause must hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Some dimension of the group sits in the top band of its group.
    AnyCritical(DimensionGroup),
    /// At least one listed dimension sits in the top band of its group.
    Critical(Vec<DimensionId>),
    /// The maturity band ranks below the named band.
    MaturityBelow(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationConfig {
    pub id: String,
    pub description: String,
    pub when: Vec<Condition>,
}

/// Sample-size rules: unit minimum, confidence thresholds and the payroll
/// divergence ratio above which reported amounts are flagged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    pub min_unit_respondents: usize,
    pub low_confidence_below: usize,
    pub moderate_confidence_below: usize,
    pub payroll_divergence_alert: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            min_unit_respondents: 2,
            low_confidence_below: 8,
            moderate_confidence_below: 20,
            payroll_divergence_alert: 0.2,
        }
    }
}

/// Scoring configuration exactly as written in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfigFile {
    #[serde(default = "AnswerScale::likert")]
    pub scale: AnswerScale,
    #[serde(default)]
    pub out_of_range: OutOfRangePolicy,
    #[serde(default)]
    pub weight_levels: BTreeMap<String, f64>,
    pub dimensions: BTreeMap<DimensionId, DimensionConfig>,
    pub items: BTreeMap<ItemId, ItemConfig>,
    #[serde(alias = "status_bands")]
    pub risk_bands: Vec<Band>,
    pub impact_bands: Vec<Band>,
    pub maturity_bands: Vec<Band>,
    #[serde(default = "default_gap_bands")]
    pub gap_bands: Vec<Band>,
    pub roi: RoiConfig,
    #[serde(default)]
    pub derived_indices: Vec<DerivedIndexConfig>,
    #[serde(default)]
    pub combinations: Vec<CombinationConfig>,
    #[serde(default)]
    pub sample: SampleConfig,
}

fn default_gap_bands() -> Vec<Band> {
    vec![
        Band::new("CONTROLADO", -100.0),
        Band::new("MODERADO", 5.0),
        Band::new("ALTO", 20.0),
        Band::new("CRITICO", 40.0),
    ]
}

/// Ordered label set; a score gets the highest band whose `min` it reaches.
#[derive(Debug, Clone, PartialEq)]
pub struct Bands {
    bands: Vec<Band>,
}

impl Bands {
    /// Validates ordering and coverage: the first band must start at or
    /// below `floor` so every reachable score has a label.
    pub fn new(name: &'static str, bands: Vec<Band>, floor: f64) -> Result<Self, ConfigurationError> {
        let invalid = |reason: String| ConfigurationError::InvalidBands { name, reason };

        let first = bands
            .first()
            .ok_or_else(|| invalid("at least one band is required".to_string()))?;
        if first.min > floor {
            return Err(invalid(format!(
                "first band '{}' starts at {} but scores can be as low as {}",
                first.label, first.min, floor
            )));
        }

        let mut seen = BTreeSet::new();
        for band in &bands {
            if band.label.trim().is_empty() {
                return Err(invalid("band labels must not be empty".to_string()));
            }
            if !band.min.is_finite() {
                return Err(invalid(format!("band '{}' has a non-finite bound", band.label)));
            }
            if !seen.insert(band.label.as_str()) {
                return Err(invalid(format!("duplicate band label '{}'", band.label)));
            }
        }

        for pair in bands.windows(2) {
            if pair[1].min <= pair[0].min {
                return Err(invalid(format!(
                    "band '{}' must start above '{}'",
                    pair[1].label, pair[0].label
                )));
            }
        }

        Ok(Self { bands })
    }

    pub fn classify(&self, score: f64) -> &Band {
        &self.bands[self.rank_of(score)]
    }

    /// Position of the band a score falls into, 0 being the lowest band.
    pub fn rank_of(&self, score: f64) -> usize {
        self.bands
            .iter()
            .rposition(|band| score >= band.min)
            .unwrap_or(0)
    }

    pub fn rank_of_label(&self, label: &str) -> Option<usize> {
        self.bands.iter().position(|band| band.label == label)
    }

    pub fn label_at(&self, rank: usize) -> &str {
        let index = rank.min(self.bands.len() - 1);
        &self.bands[index].label
    }

    pub fn top_rank(&self) -> usize {
        self.bands.len() - 1
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.rank_of_label(label).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Band> {
        self.bands.iter()
    }
}

/// Resolved per-item rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRule {
    pub dimension: DimensionId,
    pub weight: f64,
    pub invert: bool,
}

/// Resolved per-dimension rule, including the items that belong to it.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionRule {
    pub name: String,
    pub group: DimensionGroup,
    pub weight: f64,
    pub cap_score: Option<f64>,
    pub items: Vec<ItemId>,
}

/// Validated, read-only scoring configuration. Loaded once at startup and
/// passed by reference into every computation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    scale: AnswerScale,
    out_of_range: OutOfRangePolicy,
    items: BTreeMap<ItemId, ItemRule>,
    dimensions: BTreeMap<DimensionId, DimensionRule>,
    risk_bands: Bands,
    impact_bands: Bands,
    maturity_bands: Bands,
    gap_bands: Bands,
    loss_model: LossModel,
    derived_indices: Vec<DerivedIndexConfig>,
    combinations: Vec<CombinationConfig>,
    sample: SampleConfig,
}

impl ScoringConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, ConfigurationError> {
        let file: ScoringConfigFile = serde_json::from_str(contents)?;
        Self::validate(file)
    }

    pub fn validate(file: ScoringConfigFile) -> Result<Self, ConfigurationError> {
        let ScoringConfigFile {
            scale,
            out_of_range,
            weight_levels,
            dimensions,
            items,
            risk_bands,
            impact_bands,
            maturity_bands,
            gap_bands,
            roi,
            derived_indices,
            combinations,
            sample,
        } = file;

        if !scale.min.is_finite() || !scale.max.is_finite() || scale.min >= scale.max {
            return Err(ConfigurationError::InvalidScale {
                min: scale.min,
                max: scale.max,
            });
        }

        for (level, weight) in &weight_levels {
            ensure_positive(format!("level {level}"), *weight)?;
        }

        let mut dimension_rules = BTreeMap::new();
        for (id, dimension) in dimensions {
            ensure_positive(format!("dimension {id}"), dimension.weight)?;
            if let Some(cap) = dimension.cap_score {
                if !(0.0..=100.0).contains(&cap) {
                    return Err(ConfigurationError::InvalidCap { dimension: id, cap });
                }
            }
            dimension_rules.insert(
                id,
                DimensionRule {
                    name: dimension.name,
                    group: dimension.group,
                    weight: dimension.weight,
                    cap_score: dimension.cap_score,
                    items: Vec::new(),
                },
            );
        }

        let mut item_rules = BTreeMap::new();
        for (id, item) in items {
            let weight = match &item.weight {
                WeightSpec::Value(value) => *value,
                WeightSpec::Level(level) => *weight_levels.get(level).ok_or_else(|| {
                    ConfigurationError::UnknownWeightLevel {
                        item: id.clone(),
                        level: level.clone(),
                    }
                })?,
            };
            ensure_positive(format!("item {id}"), weight)?;

            let dimension = dimension_rules.get_mut(&item.dimension).ok_or_else(|| {
                ConfigurationError::UnknownDimension {
                    item: id.clone(),
                    dimension: item.dimension.clone(),
                }
            })?;
            dimension.items.push(id.clone());

            item_rules.insert(
                id,
                ItemRule {
                    dimension: item.dimension,
                    weight,
                    invert: item.invert,
                },
            );
        }

        if let Some((id, _)) = dimension_rules.iter().find(|(_, rule)| rule.items.is_empty()) {
            return Err(ConfigurationError::EmptyDimension {
                dimension: id.clone(),
            });
        }

        for group in DimensionGroup::ordered() {
            let weights: Vec<f64> = dimension_rules
                .values()
                .filter(|rule| rule.group == group)
                .map(|rule| rule.weight)
                .collect();
            if weights.is_empty() {
                return Err(ConfigurationError::EmptyGroup { group });
            }
            let sum: f64 = weights.iter().sum();
            if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                return Err(ConfigurationError::WeightSum { group, sum });
            }
        }

        let risk_bands = Bands::new("risk", risk_bands, 0.0)?;
        let impact_bands = Bands::new("impact", impact_bands, 0.0)?;
        let maturity_bands = Bands::new("maturity", maturity_bands, 0.0)?;
        let gap_bands = Bands::new("gap", gap_bands, -100.0)?;
        let loss_model = LossModel::from_config(roi, &maturity_bands)?;

        validate_derived_indices(&derived_indices, &dimension_rules)?;
        validate_combinations(&combinations, &dimension_rules, &maturity_bands)?;
        validate_sample(&sample)?;

        Ok(Self {
            scale,
            out_of_range,
            items: item_rules,
            dimensions: dimension_rules,
            risk_bands,
            impact_bands,
            maturity_bands,
            gap_bands,
            loss_model,
            derived_indices,
            combinations,
            sample,
        })
    }

    pub fn scale(&self) -> AnswerScale {
        self.scale
    }

    pub fn out_of_range(&self) -> OutOfRangePolicy {
        self.out_of_range
    }

    pub fn item(&self, id: &ItemId) -> Option<&ItemRule> {
        self.items.get(id)
    }

    pub fn items(&self) -> impl Iterator<Item = (&ItemId, &ItemRule)> {
        self.items.iter()
    }

    pub fn dimension(&self, id: &DimensionId) -> Option<&DimensionRule> {
        self.dimensions.get(id)
    }

    /// Group of the dimension an item belongs to.
    pub fn group_of(&self, item: &ItemId) -> Option<DimensionGroup> {
        let rule = self.items.get(item)?;
        self.dimensions.get(&rule.dimension).map(|dimension| dimension.group)
    }

    pub fn dimensions(&self) -> impl Iterator<Item = (&DimensionId, &DimensionRule)> {
        self.dimensions.iter()
    }

    pub fn dimensions_in(
        &self,
        group: DimensionGroup,
    ) -> impl Iterator<Item = (&DimensionId, &DimensionRule)> {
        self.dimensions
            .iter()
            .filter(move |(_, rule)| rule.group == group)
    }

    pub fn risk_bands(&self) -> &Bands {
        &self.risk_bands
    }

    pub fn impact_bands(&self) -> &Bands {
        &self.impact_bands
    }

    pub fn maturity_bands(&self) -> &Bands {
        &self.maturity_bands
    }

    /// Band set used to label a dimension of the given group.
    pub fn bands_for(&self, group: DimensionGroup) -> &Bands {
        match group {
            DimensionGroup::Risk => &self.risk_bands,
            DimensionGroup::Impact => &self.impact_bands,
            DimensionGroup::Maturity => &self.maturity_bands,
        }
    }

    pub fn gap_bands(&self) -> &Bands {
        &self.gap_bands
    }

    pub fn loss_model(&self) -> &LossModel {
        &self.loss_model
    }

    /// Derived indices in evaluation order.
    pub fn derived_indices(&self) -> &[DerivedIndexConfig] {
        &self.derived_indices
    }

    pub fn combinations(&self) -> &[CombinationConfig] {
        &self.combinations
    }

    pub fn sample(&self) -> &SampleConfig {
        &self.sample
    }
}

fn ensure_positive(subject: String, weight: f64) -> Result<(), ConfigurationError> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidWeight { subject, weight })
    }
}

fn validate_derived_indices(
    indices: &[DerivedIndexConfig],
    dimensions: &BTreeMap<DimensionId, DimensionRule>,
) -> Result<(), ConfigurationError> {
    let mut declared = BTreeSet::new();

    for index in indices {
        let invalid = |reason: String| ConfigurationError::InvalidIndicator {
            id: index.id.clone(),
            reason,
        };
        if index.id.trim().is_empty() {
            return Err(invalid("id must not be empty".to_string()));
        }
        if index.terms.is_empty() {
            return Err(invalid("at least one term is required".to_string()));
        }

        for term in &index.terms {
            ensure_positive(format!("index {} term", index.id), term.weight)?;
            match &term.source {
                IndexSource::Dimension(id) if !dimensions.contains_key(id) => {
                    return Err(invalid(format!("unknown dimension {id}")));
                }
                IndexSource::Gap(id) => match dimensions.get(id) {
                    Some(rule) if rule.group == DimensionGroup::Risk => {}
                    _ => return Err(invalid(format!("gap source {id} is not a risk dimension"))),
                },
                IndexSource::Index(other) if !declared.contains(other.as_str()) => {
                    return Err(invalid(format!(
                        "index {other} must be declared before it is used"
                    )));
                }
                _ => {}
            }
        }

        let weight_sum: f64 = index.terms.iter().map(|term| term.weight).sum();
        if weight_sum > 1.0 + WEIGHT_SUM_TOLERANCE {
            return Err(invalid(format!("term weights sum to {weight_sum:.6}, above 1")));
        }
        if !declared.insert(index.id.as_str()) {
            return Err(invalid("duplicate index id".to_string()));
        }
    }

    Ok(())
}

fn validate_combinations(
    combinations: &[CombinationConfig],
    dimensions: &BTreeMap<DimensionId, DimensionRule>,
    maturity_bands: &Bands,
) -> Result<(), ConfigurationError> {
    let mut seen = BTreeSet::new();

    for combination in combinations {
        let invalid = |reason: String| ConfigurationError::InvalidIndicator {
            id: combination.id.clone(),
            reason,
        };
        if !seen.insert(combination.id.as_str()) {
            return Err(invalid("duplicate combination id".to_string()));
        }
        if combination.when.is_empty() {
            return Err(invalid("at least one condition is required".to_string()));
        }

        for condition in &combination.when {
            match condition {
                Condition::Critical(ids) if ids.is_empty() => {
                    return Err(invalid("critical condition lists no dimensions".to_string()));
                }
                Condition::Critical(ids) => {
                    if let Some(id) = ids.iter().find(|id| !dimensions.contains_key(*id)) {
                        return Err(invalid(format!("unknown dimension {id}")));
                    }
                }
                Condition::MaturityBelow(label) if !maturity_bands.contains_label(label) => {
                    return Err(invalid(format!("unknown maturity band '{label}'")));
                }
                _ => {}
            }
        }
    }

    Ok(())
}

fn validate_sample(sample: &SampleConfig) -> Result<(), ConfigurationError> {
    if sample.min_unit_respondents == 0 {
        return Err(ConfigurationError::InvalidSample(
            "min_unit_respondents must be at least 1".to_string(),
        ));
    }
    if sample.low_confidence_below > sample.moderate_confidence_below {
        return Err(ConfigurationError::InvalidSample(format!(
            "low_confidence_below ({}) exceeds moderate_confidence_below ({})",
            sample.low_confidence_below, sample.moderate_confidence_below
        )));
    }
    if !sample.payroll_divergence_alert.is_finite() || sample.payroll_divergence_alert < 0.0 {
        return Err(ConfigurationError::InvalidSample(format!(
            "payroll_divergence_alert must be a non-negative number (got {})",
            sample.payroll_divergence_alert
        )));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Small but complete configuration: two risk dimensions (one of them
    /// with an inverted item), one impact and one maturity dimension.
    pub(crate) fn sample_file() -> ScoringConfigFile {
        let dimension = |name: &str, group, weight| DimensionConfig {
            name: name.to_string(),
            group,
            weight,
            cap_score: None,
        };
        let item = |dimension: &str, weight: f64, invert: bool| ItemConfig {
            dimension: DimensionId::from(dimension),
            weight: WeightSpec::Value(weight),
            invert,
        };

        let mut dimensions = BTreeMap::new();
        dimensions.insert(
            DimensionId::from("R1"),
            dimension("Pressure", DimensionGroup::Risk, 0.5),
        );
        dimensions.insert(
            DimensionId::from("R2"),
            dimension("Autonomy", DimensionGroup::Risk, 0.5),
        );
        dimensions.insert(
            DimensionId::from("G"),
            dimension("Impact", DimensionGroup::Impact, 1.0),
        );
        dimensions.insert(
            DimensionId::from("M"),
            dimension("Maturity", DimensionGroup::Maturity, 1.0),
        );

        let mut items = BTreeMap::new();
        items.insert(ItemId::from("R1a"), item("R1", 1.0, false));
        items.insert(ItemId::from("R1b"), item("R1", 1.0, false));
        items.insert(ItemId::from("R2a"), item("R2", 1.0, true));
        items.insert(ItemId::from("G1"), item("G", 1.0, false));
        items.insert(ItemId::from("G2"), item("G", 1.0, false));
        items.insert(ItemId::from("M1"), item("M", 1.0, false));
        items.insert(ItemId::from("M2"), item("M", 1.0, false));

        let mut maturity_factors = BTreeMap::new();
        maturity_factors.insert("inicial".to_string(), 1.2);
        maturity_factors.insert("consolidada".to_string(), 0.8);

        ScoringConfigFile {
            scale: AnswerScale::LIKERT_5,
            out_of_range: OutOfRangePolicy::Reject,
            weight_levels: BTreeMap::new(),
            dimensions,
            items,
            risk_bands: vec![
                Band::new("OK", 0.0),
                Band::new("ATENCAO", 40.0),
                Band::new("CRITICO", 70.0),
            ],
            impact_bands: vec![
                Band::new("OK", 0.0),
                Band::new("ATENCAO", 55.0),
                Band::new("CRITICO", 80.0),
            ],
            maturity_bands: vec![
                Band::new("inicial", 0.0),
                Band::new("em desenvolvimento", 40.0),
                Band::new("consolidada", 70.0),
            ],
            gap_bands: default_gap_bands(),
            roi: RoiConfig {
                risk_weight: 0.5,
                impact_weight: 0.5,
                curve: vec![
                    LossBreakpoint {
                        severity: 0.0,
                        loss_fraction: 0.0,
                    },
                    LossBreakpoint {
                        severity: 100.0,
                        loss_fraction: 0.2,
                    },
                ],
                maturity_factors,
                max_loss_fraction: 0.15,
                recoverable_factor: 0.3,
            },
            derived_indices: vec![
                derived(
                    "BURNOUT",
                    vec![
                        (IndexSource::GroupMean(DimensionGroup::Impact), 0.5),
                        (IndexSource::Dimension(DimensionId::from("R1")), 0.5),
                    ],
                ),
                derived(
                    "ABUSE",
                    vec![
                        (IndexSource::Dimension(DimensionId::from("R2")), 0.4),
                        (IndexSource::Dimension(DimensionId::from("R1")), 0.3),
                        (IndexSource::Index("BURNOUT".to_string()), 0.3),
                    ],
                ),
                derived(
                    "HARASSMENT",
                    vec![
                        (IndexSource::Dimension(DimensionId::from("R2")), 0.85),
                        (IndexSource::Gap(DimensionId::from("R2")), 0.15),
                    ],
                ),
            ],
            combinations: vec![
                combination(
                    "RISK_X_IMPACT",
                    vec![
                        Condition::AnyCritical(DimensionGroup::Risk),
                        Condition::AnyCritical(DimensionGroup::Impact),
                    ],
                ),
                combination(
                    "LEADERSHIP_CLIMATE",
                    vec![Condition::Critical(vec![DimensionId::from("R2")])],
                ),
                combination(
                    "LOW_READINESS_HIGH_RISK",
                    vec![
                        Condition::MaturityBelow("consolidada".to_string()),
                        Condition::Critical(vec![DimensionId::from("R2")]),
                    ],
                ),
            ],
            sample: SampleConfig::default(),
        }
    }

    fn derived(id: &str, terms: Vec<(IndexSource, f64)>) -> DerivedIndexConfig {
        DerivedIndexConfig {
            id: id.to_string(),
            name: id.to_lowercase(),
            terms: terms
                .into_iter()
                .map(|(source, weight)| DerivedTerm { source, weight })
                .collect(),
        }
    }

    fn combination(id: &str, when: Vec<Condition>) -> CombinationConfig {
        CombinationConfig {
            id: id.to_string(),
            description: format!("{id} detected"),
            when,
        }
    }

    pub(crate) fn sample_config() -> ScoringConfig {
        ScoringConfig::validate(sample_file()).expect("sample configuration is valid")
    }
}

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Questionnaire item identifier such as `R3` or `M11`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Named group of items scored together (e.g. `R1`, `G4`, `ESTRUTURA`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionId(pub String);

impl DimensionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DimensionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The three dimension families reported by the survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionGroup {
    Risk,
    Impact,
    Maturity,
}

impl DimensionGroup {
    pub const fn label(self) -> &'static str {
        match self {
            DimensionGroup::Risk => "risk",
            DimensionGroup::Impact => "impact",
            DimensionGroup::Maturity => "maturity",
        }
    }

    pub const fn ordered() -> [DimensionGroup; 3] {
        [
            DimensionGroup::Risk,
            DimensionGroup::Impact,
            DimensionGroup::Maturity,
        ]
    }
}

impl fmt::Display for DimensionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Payroll cell as read from the source row.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PayrollField {
    #[default]
    Missing,
    Amount(f64),
    Unreadable(String),
}

/// Declared profile of a respondent. Management answers feed the maturity
/// composite of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RespondentRole {
    Workforce,
    Management,
}

/// One respondent's answers keyed by item, ready for scoring.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResponseRow {
    pub source_id: String,
    pub unit: Option<String>,
    pub role: Option<RespondentRole>,
    pub answers: BTreeMap<ItemId, f64>,
    pub payroll: PayrollField,
}

impl ResponseRow {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            ..Self::default()
        }
    }

    pub fn with_answer(mut self, item: &str, value: f64) -> Self {
        self.answers.insert(ItemId::from(item), value);
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_role(mut self, role: RespondentRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_payroll(mut self, payroll: PayrollField) -> Self {
        self.payroll = payroll;
        self
    }
}

/// Normalized score of a single answered item, kept for audit trails.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemScore {
    pub item: ItemId,
    pub group: DimensionGroup,
    pub dimension: DimensionId,
    pub raw: f64,
    pub normalized: f64,
    pub weight: f64,
    pub inverted: bool,
}

/// Weighted average of a dimension's answered items on the 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionScore {
    pub dimension: DimensionId,
    pub name: String,
    pub group: DimensionGroup,
    pub score: f64,
    pub status: String,
    pub items_used: usize,
    pub items_expected: usize,
}

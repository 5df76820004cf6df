//! CSV intake for survey exports.
//!
//! Headers are matched to configured items, answer cells are read as the
//! first number they contain, and the payroll column accepts plain amounts,
//! Brazilian-formatted amounts and the range answers used by the survey form.

mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::scoring::{ResponseRow, ScoringConfig};

#[derive(Debug)]
pub enum IntakeError {
    Io(std::io::Error),
    Csv(csv::Error),
    NoItemColumns,
}

impl std::fmt::Display for IntakeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntakeError::Io(err) => write!(f, "failed to read survey export: {}", err),
            IntakeError::Csv(err) => write!(f, "invalid survey CSV data: {}", err),
            IntakeError::NoItemColumns => {
                write!(f, "survey CSV has no column matching a configured item")
            }
        }
    }
}

impl std::error::Error for IntakeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IntakeError::Io(err) => Some(err),
            IntakeError::Csv(err) => Some(err),
            IntakeError::NoItemColumns => None,
        }
    }
}

impl From<std::io::Error> for IntakeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for IntakeError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Names of the non-item columns. Matching ignores ASCII case.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IntakeLayout {
    pub id_column: String,
    pub unit_column: String,
    pub payroll_column: String,
    pub profile_column: String,
    /// Profile keywords marking workforce respondents; other declared
    /// profiles count as management.
    pub workforce_profiles: Vec<String>,
}

impl Default for IntakeLayout {
    fn default() -> Self {
        Self {
            id_column: "id".to_string(),
            unit_column: "unit".to_string(),
            payroll_column: "payroll".to_string(),
            profile_column: "profile".to_string(),
            workforce_profiles: vec!["colaborador".to_string()],
        }
    }
}

pub struct ResponseImporter;

impl ResponseImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        layout: &IntakeLayout,
        config: &ScoringConfig,
    ) -> Result<Vec<ResponseRow>, IntakeError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, layout, config)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        layout: &IntakeLayout,
        config: &ScoringConfig,
    ) -> Result<Vec<ResponseRow>, IntakeError> {
        let (plan, rows) = parser::parse_rows(reader, layout, config)?;
        if plan.item_columns() == 0 {
            return Err(IntakeError::NoItemColumns);
        }

        info!(
            rows = rows.len(),
            item_columns = plan.item_columns(),
            "imported survey responses"
        );
        Ok(rows)
    }
}

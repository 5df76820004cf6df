use chrono::{DateTime, Utc};
use serde::Serialize;

use super::composite::{CompositeIndices, CriticalCombination, DerivedIndex, Diagnosis, GapEntry};
use super::domain::{DimensionScore, ItemScore};
use super::error::ScoringError;
use super::roi::RoiEstimate;
use super::sample::{PayrollSummary, RoleCounts, SampleConfidence};

pub const REPORT_SCHEMA_NAME: &str = "psychosocial_risk_report";
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchemaInfo {
    pub name: &'static str,
    pub version: &'static str,
}

/// Traceability data linking a record back to the raw rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetadata {
    pub source_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub respondents: usize,
    pub workforce: usize,
    pub management: usize,
    /// Respondents whose answers fed the maturity composite.
    pub maturity_raters: usize,
    pub source_rows: Vec<String>,
    pub processed_at: DateTime<Utc>,
}

/// Everything computed for one respondent or unit, frozen at assembly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRecord {
    schema: SchemaInfo,
    metadata: ReportMetadata,
    items: Vec<ItemScore>,
    dimensions: Vec<DimensionScore>,
    indices: CompositeIndices,
    derived_indices: Vec<DerivedIndex>,
    diagnosis: Diagnosis,
    combinations: Vec<CriticalCombination>,
    gaps: Vec<GapEntry>,
    confidence: SampleConfidence,
    payroll: PayrollSummary,
    roi: Option<RoiEstimate>,
}

impl ReportRecord {
    pub fn schema(&self) -> SchemaInfo {
        self.schema
    }

    pub fn metadata(&self) -> &ReportMetadata {
        &self.metadata
    }

    pub fn source_id(&self) -> &str {
        &self.metadata.source_id
    }

    pub fn items(&self) -> &[ItemScore] {
        &self.items
    }

    pub fn dimensions(&self) -> &[DimensionScore] {
        &self.dimensions
    }

    pub fn dimension(&self, id: &str) -> Option<&DimensionScore> {
        self.dimensions
            .iter()
            .find(|score| score.dimension.as_str() == id)
    }

    pub fn indices(&self) -> &CompositeIndices {
        &self.indices
    }

    pub fn derived_indices(&self) -> &[DerivedIndex] {
        &self.derived_indices
    }

    pub fn derived_index(&self, id: &str) -> Option<&DerivedIndex> {
        self.derived_indices.iter().find(|index| index.id == id)
    }

    pub fn diagnosis(&self) -> &Diagnosis {
        &self.diagnosis
    }

    pub fn combinations(&self) -> &[CriticalCombination] {
        &self.combinations
    }

    pub fn confidence(&self) -> &SampleConfidence {
        &self.confidence
    }

    pub fn payroll(&self) -> &PayrollSummary {
        &self.payroll
    }

    pub fn gaps(&self) -> &[GapEntry] {
        &self.gaps
    }

    pub fn roi(&self) -> Option<&RoiEstimate> {
        self.roi.as_ref()
    }
}

/// Computed artifacts handed to the assembler.
#[derive(Debug, Clone)]
pub struct RecordParts {
    pub source_id: String,
    pub unit: Option<String>,
    pub source_rows: Vec<String>,
    pub roles: RoleCounts,
    pub maturity_raters: usize,
    pub items: Vec<ItemScore>,
    pub dimensions: Vec<DimensionScore>,
    pub indices: CompositeIndices,
    pub derived_indices: Vec<DerivedIndex>,
    pub diagnosis: Diagnosis,
    pub combinations: Vec<CriticalCombination>,
    pub gaps: Vec<GapEntry>,
    pub confidence: SampleConfidence,
    pub payroll: PayrollSummary,
    pub roi: Option<RoiEstimate>,
}

/// Stamps every record of a run with the same processing timestamp.
#[derive(Debug, Clone, Copy)]
pub struct ReportAssembler {
    processed_at: DateTime<Utc>,
}

impl ReportAssembler {
    pub fn new(processed_at: DateTime<Utc>) -> Self {
        Self { processed_at }
    }

    pub fn assemble(&self, parts: RecordParts) -> ReportRecord {
        let RecordParts {
            source_id,
            unit,
            source_rows,
            roles,
            maturity_raters,
            items,
            dimensions,
            indices,
            derived_indices,
            diagnosis,
            combinations,
            gaps,
            confidence,
            payroll,
            roi,
        } = parts;

        ReportRecord {
            schema: SchemaInfo {
                name: REPORT_SCHEMA_NAME,
                version: REPORT_SCHEMA_VERSION,
            },
            metadata: ReportMetadata {
                source_id,
                unit,
                respondents: source_rows.len(),
                workforce: roles.workforce,
                management: roles.management,
                maturity_raters,
                source_rows,
                processed_at: self.processed_at,
            },
            items,
            dimensions,
            indices,
            derived_indices,
            diagnosis,
            combinations,
            gaps,
            confidence,
            payroll,
            roi,
        }
    }
}

/// A record dropped from a batch, with the reason surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordExclusion {
    pub source_id: String,
    pub kind: &'static str,
    pub reason: String,
}

impl RecordExclusion {
    pub fn new(source_id: impl Into<String>, error: &ScoringError) -> Self {
        Self {
            source_id: source_id.into(),
            kind: error.kind(),
            reason: error.to_string(),
        }
    }
}

/// Output of one processing run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub records: Vec<ReportRecord>,
    pub exclusions: Vec<RecordExclusion>,
}

impl BatchReport {
    pub fn record(&self, source_id: &str) -> Option<&ReportRecord> {
        self.records
            .iter()
            .find(|record| record.source_id() == source_id)
    }

    pub fn exclusion(&self, source_id: &str) -> Option<&RecordExclusion> {
        self.exclusions
            .iter()
            .find(|exclusion| exclusion.source_id == source_id)
    }
}

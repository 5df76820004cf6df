use std::collections::HashSet;
use std::io::Read;

use csv::StringRecord;
use tracing::warn;

use super::normalizer::{
    item_for_header, normalize_header, parse_answer, parse_payroll, parse_role,
};
use super::IntakeLayout;
use crate::scoring::{ItemId, ResponseRow, ScoringConfig};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Column {
    SourceId,
    Unit,
    Payroll,
    Profile,
    Item(ItemId),
    Ignored,
}

/// Role of every header, in column order.
#[derive(Debug)]
pub(crate) struct ColumnPlan {
    columns: Vec<Column>,
    workforce_profiles: Vec<String>,
}

impl ColumnPlan {
    pub(crate) fn from_headers(
        headers: &StringRecord,
        layout: &IntakeLayout,
        config: &ScoringConfig,
    ) -> Self {
        let columns = headers
            .iter()
            .map(|raw| {
                let header = normalize_header(raw);
                if header.eq_ignore_ascii_case(&layout.id_column) {
                    Column::SourceId
                } else if header.eq_ignore_ascii_case(&layout.unit_column) {
                    Column::Unit
                } else if header.eq_ignore_ascii_case(&layout.payroll_column) {
                    Column::Payroll
                } else if header.eq_ignore_ascii_case(&layout.profile_column) {
                    Column::Profile
                } else {
                    item_for_header(&header, config).map_or(Column::Ignored, Column::Item)
                }
            })
            .collect();

        Self {
            columns,
            workforce_profiles: layout.workforce_profiles.clone(),
        }
    }

    pub(crate) fn item_columns(&self) -> usize {
        self.columns
            .iter()
            .filter(|column| matches!(column, Column::Item(_)))
            .count()
    }

    fn row(&self, position: usize, record: &StringRecord) -> ResponseRow {
        let mut row = ResponseRow::new(format!("row-{:04}", position + 1));

        for (column, cell) in self.columns.iter().zip(record.iter()) {
            match column {
                Column::SourceId if !cell.is_empty() => row.source_id = cell.to_string(),
                Column::Unit if !cell.is_empty() => row.unit = Some(cell.to_string()),
                Column::Payroll => row.payroll = parse_payroll(cell),
                Column::Profile => row.role = parse_role(cell, &self.workforce_profiles),
                Column::Item(item) => {
                    if let Some(value) = parse_answer(cell) {
                        row.answers.entry(item.clone()).or_insert(value);
                    }
                }
                Column::SourceId | Column::Unit | Column::Ignored => {}
            }
        }

        row
    }
}

pub(crate) fn parse_rows<R: Read>(
    reader: R,
    layout: &IntakeLayout,
    config: &ScoringConfig,
) -> Result<(ColumnPlan, Vec<ResponseRow>), csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let plan = ColumnPlan::from_headers(csv_reader.headers()?, layout, config);
    let mut rows = Vec::new();
    let mut seen = HashSet::new();

    for (position, record) in csv_reader.records().enumerate() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let mut row = plan.row(position, &record);
        if !seen.insert(row.source_id.clone()) {
            let renamed = format!("{}-row-{:04}", row.source_id, position + 1);
            warn!(
                source_id = %row.source_id,
                renamed = %renamed,
                "duplicate respondent id in survey export"
            );
            row.source_id = renamed;
            seen.insert(row.source_id.clone());
        }
        rows.push(row);
    }

    Ok((plan, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::config::fixtures::sample_config;
    use crate::scoring::PayrollField;
    use std::io::Cursor;

    #[test]
    fn plan_assigns_roles_case_insensitively() {
        let config = sample_config();
        let headers = StringRecord::from(vec![
            "ID",
            "Unit",
            "R1a - Prazos",
            "Payroll",
            "Profile",
            "Obs",
        ]);
        let plan = ColumnPlan::from_headers(&headers, &IntakeLayout::default(), &config);

        assert_eq!(
            plan.columns,
            vec![
                Column::SourceId,
                Column::Unit,
                Column::Item(ItemId::from("R1a")),
                Column::Payroll,
                Column::Profile,
                Column::Ignored,
            ]
        );
        assert_eq!(plan.item_columns(), 1);
    }

    #[test]
    fn rows_without_id_column_are_numbered() {
        let config = sample_config();
        let csv = "R1a,G1\n5,4\n\n3,2\n";
        let (_, rows) = parse_rows(Cursor::new(csv), &IntakeLayout::default(), &config)
            .expect("parse");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].source_id, "row-0001");
        assert_eq!(rows[0].answers.get(&ItemId::from("R1a")), Some(&5.0));
        assert_eq!(rows[0].payroll, PayrollField::Missing);
        assert_eq!(rows[0].unit, None);
        assert_eq!(rows[0].role, None);
    }

    #[test]
    fn numbered_rows_never_collide() {
        let config = sample_config();
        let csv = "id,G1\n,3\nrow-0001,4\n";
        let (_, rows) = parse_rows(Cursor::new(csv), &IntakeLayout::default(), &config)
            .expect("parse");

        assert_eq!(rows[0].source_id, "row-0001");
        assert_eq!(rows[1].source_id, "row-0001-row-0002");
    }

    #[test]
    fn short_rows_leave_trailing_items_unanswered() {
        let config = sample_config();
        let csv = "id,R1a,G1,G2\nabc,5\n";
        let (_, rows) = parse_rows(Cursor::new(csv), &IntakeLayout::default(), &config)
            .expect("flexible rows parse");

        assert_eq!(rows[0].source_id, "abc");
        assert_eq!(rows[0].answers.len(), 1);
    }
}

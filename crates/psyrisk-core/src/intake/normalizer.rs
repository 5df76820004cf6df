use once_cell::sync::Lazy;
use regex::Regex;

use crate::scoring::{ItemId, PayrollField, RespondentRole, ScoringConfig};

static ANSWER_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+(?:[.,]\d+)?").expect("answer pattern compiles"));
static MONEY_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d[\d.,]*").expect("money pattern compiles"));
static THOUSANDS_GROUPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}(?:\.\d{3})+$").expect("thousands pattern compiles"));

const PAYROLL_OPT_OUTS: [&str; 2] = ["prefiro", "não informar"];

pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolves a header to a configured item, either by exact id or by the
/// `"<ID> - question text"` form used by survey exports.
pub(crate) fn item_for_header(header: &str, config: &ScoringConfig) -> Option<ItemId> {
    let exact = ItemId::from(header);
    if config.item(&exact).is_some() {
        return Some(exact);
    }

    let (prefix, _) = header.split_once(" -")?;
    let candidate = ItemId::from(prefix.trim());
    config.item(&candidate).map(|_| candidate)
}

/// First number in the cell; `"4 = Frequentemente"` reads as 4.
pub(crate) fn parse_answer(cell: &str) -> Option<f64> {
    let found = ANSWER_NUMBER.find(cell.trim())?;
    found.as_str().replace(',', ".").parse().ok()
}

/// Profile cells naming one of `workforce_profiles` (case-insensitive
/// substring) are workforce; any other non-empty profile is management.
pub(crate) fn parse_role(cell: &str, workforce_profiles: &[String]) -> Option<RespondentRole> {
    let profile = cell.trim().to_lowercase();
    if profile.is_empty() {
        return None;
    }
    let workforce = workforce_profiles
        .iter()
        .any(|marker| profile.contains(&marker.to_lowercase()));
    Some(if workforce {
        RespondentRole::Workforce
    } else {
        RespondentRole::Management
    })
}

pub(crate) fn parse_payroll(cell: &str) -> PayrollField {
    let text = cell.trim().to_lowercase();
    if text.is_empty() || PAYROLL_OPT_OUTS.iter().any(|marker| text.contains(marker)) {
        return PayrollField::Missing;
    }

    let values: Vec<f64> = MONEY_NUMBER
        .find_iter(&text)
        .filter_map(|found| parse_money(found.as_str()))
        .collect();
    let Some(&first) = values.first() else {
        return PayrollField::Unreadable(cell.trim().to_string());
    };

    let amount = if text.contains("até") {
        first / 2.0
    } else if text.contains("acima") || text.contains("mais de") {
        first
    } else if values.len() >= 2 && (text.contains(" a ") || text.contains('-')) {
        (first + values[1]) / 2.0
    } else if text.starts_with('-') {
        -first
    } else {
        first
    };

    PayrollField::Amount(amount)
}

/// Reads plain (`120000.50`) and Brazilian (`120.000,00`) amounts.
fn parse_money(token: &str) -> Option<f64> {
    let token = token.trim_end_matches(['.', ',']);
    let plain = if token.contains(',') {
        token.replace('.', "").replace(',', ".")
    } else if THOUSANDS_GROUPED.is_match(token) {
        token.replace('.', "")
    } else {
        token.to_string()
    };
    plain.parse().ok()
}

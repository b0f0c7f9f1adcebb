//! Holding model and sheet-row classification
//!
//! The holdings sheet mixes mutual fund rows (units, valued against
//! the NAV feed) with direct-value rows such as stocks or bank balance
//! whose monetary value is recorded in the sheet itself. Classification
//! is by the first column: a known direct-value label makes the row a
//! direct-value holding, anything else is a unit-based fund.

pub mod sheet;

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Sheet column holding the direct value for direct-value rows
const VALUE_COLUMN: usize = 2;
/// Sheet column holding the category label for fund rows
const CATEGORY_COLUMN: usize = 1;
/// Sheet column holding the unit count for fund rows
const UNITS_COLUMN: usize = 7;

/// Asset category for the equity/debt split.
///
/// Open-ended on purpose: unknown labels are carried through and count
/// toward the total but toward neither split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Equity,
    Debt,
    Other(String),
}

impl Category {
    pub fn parse(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        match lower.as_str() {
            "equity" => Category::Equity,
            "debt" => Category::Debt,
            _ => Category::Other(lower),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Equity => write!(f, "EQUITY"),
            Category::Debt => write!(f, "DEBT"),
            Category::Other(label) => write!(f, "{}", label.to_uppercase()),
        }
    }
}

/// How a holding's value is determined
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldingKind {
    /// Monetary value recorded directly in the sheet
    DirectValue { value: Decimal },
    /// Unit count to be multiplied by a resolved NAV
    UnitBased { units: Decimal },
}

/// One normalized row from the holdings sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holding {
    pub scheme_name: String,
    pub category: Category,
    pub kind: HoldingKind,
}

/// Labels whose rows carry a direct value instead of fund units
fn direct_value_category(label: &str) -> Option<Category> {
    match label {
        "stocks" => Some(Category::Equity),
        "bank balance" => Some(Category::Debt),
        "epfo" => Some(Category::Debt),
        "ppf" => Some(Category::Debt),
        "nps debt" => Some(Category::Debt),
        "nps equity" => Some(Category::Equity),
        _ => None,
    }
}

/// Parse sheet numbers that may carry thousands separators,
/// e.g. "1,531,903.05". Unparseable input counts as zero.
pub fn parse_formatted_number(raw: &str) -> Decimal {
    let cleaned = raw.trim().replace(',', "");
    Decimal::from_str(&cleaned).unwrap_or(Decimal::ZERO)
}

/// Classify data rows (header already removed) into holdings.
///
/// Rows with fewer than 3 columns, an empty name, or a non-positive
/// value/unit count are skipped.
pub fn classify_rows(rows: &[Vec<String>]) -> Vec<Holding> {
    let mut holdings = Vec::new();

    for row in rows {
        if row.len() <= 2 {
            continue;
        }
        let scheme_name = row[0].trim();
        if scheme_name.is_empty() {
            continue;
        }

        if let Some(category) = direct_value_category(&scheme_name.to_lowercase()) {
            let value = parse_formatted_number(cell(row, VALUE_COLUMN));
            if value > Decimal::ZERO {
                holdings.push(Holding {
                    scheme_name: scheme_name.to_string(),
                    category,
                    kind: HoldingKind::DirectValue { value },
                });
            }
        } else {
            let units = parse_formatted_number(cell(row, UNITS_COLUMN));
            if units > Decimal::ZERO {
                let label = cell(row, CATEGORY_COLUMN).trim();
                let category = if label.is_empty() {
                    Category::Equity
                } else {
                    Category::parse(label)
                };
                holdings.push(Holding {
                    scheme_name: scheme_name.to_string(),
                    category,
                    kind: HoldingKind::UnitBased { units },
                });
            }
        }
    }

    holdings
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

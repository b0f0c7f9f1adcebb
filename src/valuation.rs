//! Portfolio aggregation
//!
//! Turns the holdings list plus the NAV registry into one snapshot.
//! A holding that cannot be valued never aborts the pass: it is
//! recorded as unresolved, contributes zero to every total, and the
//! remaining holdings are processed normally. The only way the overall
//! call fails is a failed NAV feed refresh.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use rust_decimal::Decimal;
use tracing::warn;

use crate::holdings::{Category, Holding, HoldingKind};
use crate::nav::feed::NavSource;
use crate::nav::NavRegistry;

/// Per-holding valuation outcome. None fields are the "not applicable"
/// or "unresolved" sentinels, rendered as "-" / "N/A" downstream.
#[derive(Debug, Clone)]
pub struct ValuationDetail {
    pub scheme_name: String,
    pub units: Option<Decimal>,
    pub nav: Option<Decimal>,
    pub value: Option<Decimal>,
    pub category: Category,
    pub error: Option<String>,
}

/// Immutable result of one valuation pass over the holdings list
#[derive(Debug, Clone)]
pub struct PortfolioSnapshot {
    pub total_value: Decimal,
    pub equity_value: Decimal,
    pub debt_value: Decimal,
    pub equity_percent: Decimal,
    pub debt_percent: Decimal,
    /// One entry per input holding, in input order
    pub details: Vec<ValuationDetail>,
    pub errors: Vec<String>,
    pub date: DateTime<Local>,
    pub holdings_count: usize,
}

/// Value the holdings, refreshing the NAV cache first when stale.
pub async fn calculate_portfolio<S: NavSource>(
    registry: &mut NavRegistry,
    feed: &S,
    holdings: &[Holding],
) -> Result<PortfolioSnapshot> {
    if !registry.is_fresh(Utc::now()) {
        let raw = feed.fetch().await.context("NAV data refresh failed")?;
        registry.ingest(&raw);
    }
    Ok(value_holdings(registry, holdings, Local::now()))
}

/// Pure valuation pass. No rounding happens here; presentation rounds.
pub fn value_holdings(
    registry: &NavRegistry,
    holdings: &[Holding],
    date: DateTime<Local>,
) -> PortfolioSnapshot {
    let mut total_value = Decimal::ZERO;
    let mut equity_value = Decimal::ZERO;
    let mut debt_value = Decimal::ZERO;
    let mut details = Vec::with_capacity(holdings.len());
    let mut errors = Vec::new();

    for holding in holdings {
        match &holding.kind {
            HoldingKind::DirectValue { value } => {
                add_to_totals(
                    *value,
                    &holding.category,
                    &mut total_value,
                    &mut equity_value,
                    &mut debt_value,
                );
                details.push(ValuationDetail {
                    scheme_name: holding.scheme_name.clone(),
                    units: None,
                    nav: None,
                    value: Some(*value),
                    category: holding.category.clone(),
                    error: None,
                });
            }
            HoldingKind::UnitBased { units } => match registry.resolve(&holding.scheme_name) {
                Some(record) => {
                    let value = *units * record.nav;
                    add_to_totals(
                        value,
                        &holding.category,
                        &mut total_value,
                        &mut equity_value,
                        &mut debt_value,
                    );
                    details.push(ValuationDetail {
                        scheme_name: holding.scheme_name.clone(),
                        units: Some(*units),
                        nav: Some(record.nav),
                        value: Some(value),
                        category: holding.category.clone(),
                        error: None,
                    });
                }
                None => {
                    warn!("Skipping {} - NAV not available", holding.scheme_name);
                    errors.push(format!("NAV not found for: {}", holding.scheme_name));
                    details.push(ValuationDetail {
                        scheme_name: holding.scheme_name.clone(),
                        units: Some(*units),
                        nav: None,
                        value: None,
                        category: holding.category.clone(),
                        error: Some("NAV not found".to_string()),
                    });
                }
            },
        }
    }

    let hundred = Decimal::from(100);
    let (equity_percent, debt_percent) = if total_value > Decimal::ZERO {
        (
            equity_value / total_value * hundred,
            debt_value / total_value * hundred,
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    PortfolioSnapshot {
        total_value,
        equity_value,
        debt_value,
        equity_percent,
        debt_percent,
        details,
        errors,
        date,
        holdings_count: holdings.len(),
    }
}

fn add_to_totals(
    value: Decimal,
    category: &Category,
    total: &mut Decimal,
    equity: &mut Decimal,
    debt: &mut Decimal,
) {
    *total += value;
    match category {
        Category::Equity => *equity += value,
        Category::Debt => *debt += value,
        // Unknown categories count toward the total but toward neither
        // split, so equity% + debt% can be under 100.
        Category::Other(_) => {}
    }
}

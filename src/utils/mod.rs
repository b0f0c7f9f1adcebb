//! Utility functions for formatting and common operations
//!
//! This module provides centralized formatting utilities for consistent
//! display of currency and percentage values throughout the application.

use rust_decimal::Decimal;

/// Currency symbol options for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencySymbol {
    /// Include "₹" prefix (Indian Rupee)
    Inr,
    /// No currency symbol (for table cells, plain number display)
    None,
}

/// Core formatting function with full control over output.
///
/// Formats a Decimal value using Indian locale conventions: the last
/// three integer digits form one group, every group before it has two
/// digits (lakh/crore grouping), separated by commas.
///
/// # Examples
/// ```
/// use fundwatch::utils::{format_amount, CurrencySymbol};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let value = Decimal::from_str("1531903.05").unwrap();
/// assert_eq!(format_amount(value, CurrencySymbol::Inr), "₹15,31,903.05");
/// ```
pub fn format_amount(value: Decimal, symbol: CurrencySymbol) -> String {
    let is_negative = value < Decimal::ZERO;
    let abs_value = value.abs();

    // Round to 2 decimal places and split into integer/fraction
    let formatted = format!("{:.2}", abs_value);
    let parts: Vec<&str> = formatted.split('.').collect();

    let integer_part = parts[0];
    let decimal_part = parts.get(1).unwrap_or(&"00");

    let with_separators = group_indian(integer_part);

    let sign = if is_negative { "-" } else { "" };
    let prefix = match symbol {
        CurrencySymbol::Inr => "₹",
        CurrencySymbol::None => "",
    };

    format!("{}{}{}.{}", prefix, sign, with_separators, decimal_part)
}

/// Insert commas per the Indian grouping rule: "1234567" -> "12,34,567"
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);

    // Head is grouped in pairs from the right
    let mut groups: Vec<String> = Vec::new();
    let head_chars: Vec<char> = head.chars().collect();
    let mut i = head_chars.len();
    while i > 0 {
        let start = i.saturating_sub(2);
        groups.push(head_chars[start..i].iter().collect());
        i = start;
    }
    groups.reverse();
    groups.push(tail.to_string());

    groups.join(",")
}

// ============ Convenience functions ============

/// Format as Indian Rupees with symbol: "₹15,31,903.05"
///
/// # Examples
/// ```
/// use fundwatch::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.56)), "₹1,234.56");
/// assert_eq!(format_currency(dec!(-500)), "₹-500.00");
/// ```
pub fn format_currency(value: Decimal) -> String {
    format_amount(value, CurrencySymbol::Inr)
}

/// Format number only (no symbol): "15,31,903.05"
pub fn format_number(value: Decimal) -> String {
    format_amount(value, CurrencySymbol::None)
}

/// Format a percentage with two decimals: "64.27%"
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", value)
}

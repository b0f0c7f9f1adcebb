//! HTML report document
//!
//! Self-contained inline-styled HTML suitable for mail clients:
//! header, warnings block, summary cards, holdings table, footer.
//! Unresolved holdings render "N/A" and get a highlighted row.

use crate::cadence::ReportKind;
use crate::utils::{format_currency, format_number, format_percent};
use crate::valuation::{PortfolioSnapshot, ValuationDetail};

pub fn render(snapshot: &PortfolioSnapshot, kind: ReportKind) -> String {
    let mut rows = String::new();
    for detail in &snapshot.details {
        rows.push_str(&detail_row(detail));
    }

    let warnings = if snapshot.errors.is_empty() {
        String::new()
    } else {
        let items: String = snapshot
            .errors
            .iter()
            .map(|e| format!("<li>{}</li>", escape(e)))
            .collect();
        format!(
            r#"<div style="margin: 20px 0; padding: 15px; background-color: #fff3cd; border-left: 4px solid #ffc107; border-radius: 5px;">
  <h3 style="margin-top: 0; color: #856404;">Warnings</h3>
  <ul style="margin: 0; padding-left: 20px;">{items}</ul>
</div>
"#
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<style>
  body {{ font-family: Arial, sans-serif; margin: 20px; background-color: #f5f5f5; }}
  .container {{ max-width: 900px; margin: 0 auto; background-color: white; padding: 20px; border-radius: 10px; }}
  .header {{ background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 30px; border-radius: 5px; margin-bottom: 20px; }}
  .header h1 {{ margin: 0 0 10px 0; font-size: 28px; }}
  .header p {{ margin: 0; opacity: 0.9; }}
  .summary {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 15px; margin: 20px 0; }}
  .summary-card {{ background-color: #f9f9f9; padding: 20px; border-radius: 8px; border-left: 4px solid #667eea; }}
  .summary-card .label {{ font-size: 12px; text-transform: uppercase; color: #666; margin-bottom: 8px; }}
  .summary-card .value {{ font-size: 24px; font-weight: bold; color: #333; }}
  table {{ width: 100%; border-collapse: collapse; margin: 20px 0; }}
  th {{ background-color: #667eea; color: white; padding: 12px 10px; text-align: left; }}
  .footer {{ margin-top: 30px; padding-top: 20px; border-top: 1px solid #ddd; font-size: 12px; color: #666; text-align: center; }}
</style>
</head>
<body>
<div class="container">
  <div class="header">
    <h1>Mutual Fund Portfolio Report</h1>
    <p>{kind} Report | {date}</p>
  </div>
{warnings}
  <div class="summary">
    <div class="summary-card"><div class="label">Total Portfolio Value</div><div class="value">{total}</div></div>
    <div class="summary-card"><div class="label">Equity Allocation</div><div class="value">{equity}</div></div>
    <div class="summary-card"><div class="label">Debt Allocation</div><div class="value">{debt}</div></div>
  </div>
  <h2 style="color: #333; margin-top: 30px;">Holdings Details ({count} schemes)</h2>
  <table>
    <thead>
      <tr>
        <th>Scheme Name</th>
        <th style="text-align: right;">Units</th>
        <th style="text-align: right;">NAV</th>
        <th style="text-align: right;">Value</th>
        <th style="text-align: center;">Category</th>
      </tr>
    </thead>
    <tbody>
{rows}    </tbody>
  </table>
  <div class="footer">
    <p><strong>Fundwatch</strong> | NAV data source: AMFI India</p>
    <p>Report generated automatically. For informational purposes only.</p>
  </div>
</div>
</body>
</html>
"#,
        kind = kind,
        date = snapshot.date.format("%A, %-d %B %Y"),
        warnings = warnings,
        total = format_currency(snapshot.total_value),
        equity = format_percent(snapshot.equity_percent),
        debt = format_percent(snapshot.debt_percent),
        count = snapshot.holdings_count,
        rows = rows,
    )
}

fn detail_row(detail: &ValuationDetail) -> String {
    let row_style = if detail.error.is_some() {
        r#" style="background-color: #fff3cd;""#
    } else {
        ""
    };
    let units = match detail.units {
        Some(units) => format!("{:.2}", units),
        None => "-".to_string(),
    };
    let nav = match detail.nav {
        Some(nav) => format_currency(nav),
        None if detail.units.is_some() => "N/A".to_string(),
        None => "-".to_string(),
    };
    let value = match detail.value {
        Some(value) => format_currency(value),
        None => "N/A".to_string(),
    };

    format!(
        r#"      <tr{row_style}>
        <td style="padding: 8px; border: 1px solid #ddd;">{name}</td>
        <td style="padding: 8px; border: 1px solid #ddd; text-align: right;">{units}</td>
        <td style="padding: 8px; border: 1px solid #ddd; text-align: right;">{nav}</td>
        <td style="padding: 8px; border: 1px solid #ddd; text-align: right;">{value}</td>
        <td style="padding: 8px; border: 1px solid #ddd; text-align: center;">{category}</td>
      </tr>
"#,
        row_style = row_style,
        name = escape(&detail.scheme_name),
        units = units,
        nav = nav,
        value = value,
        category = detail.category,
    )
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

//! Holdings sheet adapter
//!
//! Reads the portfolio sheet as CSV, either from a published-sheet
//! export URL or a local file, and classifies its rows. The first row
//! is always treated as the header.

use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::holdings::{classify_rows, Holding};
use crate::nav::feed::is_remote;

/// Fetches and classifies the holdings sheet
pub struct SheetClient {
    source: String,
    timeout: Duration,
}

impl SheetClient {
    pub fn new(source: impl Into<String>, timeout: Duration) -> Self {
        Self {
            source: source.into(),
            timeout,
        }
    }

    /// Read the sheet and return the classified holdings, in row order.
    pub async fn read_holdings(&self) -> Result<Vec<Holding>> {
        let raw = self.fetch_text().await?;
        let rows = parse_csv_rows(&raw)?;

        if rows.is_empty() {
            return Err(anyhow!("No data found in holdings sheet"));
        }
        debug!("Holdings sheet has {} rows (incl. header)", rows.len());

        let holdings = classify_rows(&rows[1..]);
        info!("Read {} holdings from sheet", holdings.len());
        Ok(holdings)
    }

    async fn fetch_text(&self) -> Result<String> {
        if !is_remote(&self.source) {
            return std::fs::read_to_string(&self.source)
                .with_context(|| format!("Failed to read holdings file: {}", self.source));
        }

        info!("Reading holdings sheet from {}", self.source);

        let client = Client::builder().timeout(self.timeout).build()?;
        let response = client
            .get(&self.source)
            .send()
            .await
            .context("Failed to fetch holdings sheet")?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Holdings sheet returned error status: {}",
                response.status()
            ));
        }

        response
            .text()
            .await
            .context("Failed to read holdings sheet body")
    }
}

/// Parse CSV into raw string rows. Rows may have varying widths.
fn parse_csv_rows(raw: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(raw.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to read holdings CSV record")?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(rows)
}

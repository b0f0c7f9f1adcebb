//! NAV registry - name-indexed cache of mutual fund prices
//!
//! Ingests the AMFI bulk NAV listing (semicolon-delimited, one scheme
//! per line) and resolves scheme names to prices. The holdings sheet
//! and the price feed are maintained independently, so exact-name
//! matching is brittle to formatting drift; resolution falls back to a
//! substring containment scan over the feed in feed order. That
//! fallback trades precision for coverage and is part of the contract.

pub mod feed;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Cached NAV data stays valid for this long after an ingest.
const FRESHNESS_WINDOW_HOURS: i64 = 24;

/// First field of the feed's header line.
const HEADER_SENTINEL: &str = "Scheme Code";

/// One scheme's entry from the bulk feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavRecord {
    pub code: String,
    pub name: String,
    pub nav: Decimal,
}

/// Name-indexed NAV cache with a freshness window.
///
/// Owned state passed by reference into the aggregator; the cache is
/// replaced wholesale on each ingest, never merged.
#[derive(Debug, Default)]
pub struct NavRegistry {
    /// Records in feed order of the last ingest
    records: Vec<NavRecord>,
    /// Normalized scheme name -> position in `records`
    index: HashMap<String, usize>,
    last_ingest: Option<DateTime<Utc>>,
}

impl NavRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the raw bulk feed and replace the whole cache, stamping now.
    pub fn ingest(&mut self, raw: &str) {
        self.ingest_at(raw, Utc::now());
    }

    /// Parse the raw bulk feed and replace the whole cache.
    ///
    /// Malformed or non-matching lines are skipped; ingest itself never
    /// fails. A duplicate normalized name overwrites the earlier record
    /// in place, keeping its original position in scan order.
    pub fn ingest_at(&mut self, raw: &str, now: DateTime<Utc>) {
        let mut records: Vec<NavRecord> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for line in raw.lines() {
            let Some(record) = parse_feed_line(line) else {
                continue;
            };
            let key = normalize(&record.name);
            match index.entry(key) {
                Entry::Occupied(slot) => records[*slot.get()] = record,
                Entry::Vacant(slot) => {
                    slot.insert(records.len());
                    records.push(record);
                }
            }
        }

        info!("NAV feed ingested: {} schemes", records.len());
        self.records = records;
        self.index = index;
        self.last_ingest = Some(now);
    }

    /// True iff an ingest has happened within the freshness window.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.last_ingest
            .map(|at| now.signed_duration_since(at) < Duration::hours(FRESHNESS_WINDOW_HOURS))
            .unwrap_or(false)
    }

    /// Resolve a scheme name to its NAV record.
    ///
    /// Exact normalized match first; on a miss, the first cached record
    /// (in feed order) whose normalized name contains the query, or is
    /// contained by it, wins. Returns None when nothing matches.
    pub fn resolve(&self, scheme_name: &str) -> Option<&NavRecord> {
        let query = normalize(scheme_name);

        if let Some(&pos) = self.index.get(&query) {
            return Some(&self.records[pos]);
        }

        for record in &self.records {
            let key = normalize(&record.name);
            if key.contains(&query) || query.contains(&key) {
                debug!("Fuzzy matched: \"{}\" -> \"{}\"", scheme_name, record.name);
                return Some(record);
            }
        }

        warn!("NAV not found for scheme: {}", scheme_name);
        None
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A line qualifies as a NAV record when it has at least 5 fields, a
/// non-empty scheme name (field 3), a positive decimal NAV (field 4),
/// and is not the header. Everything else is skipped.
fn parse_feed_line(line: &str) -> Option<NavRecord> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(HEADER_SENTINEL) {
        return None;
    }

    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() < 5 {
        return None;
    }

    let name = fields[3].trim();
    if name.is_empty() {
        return None;
    }

    let nav = Decimal::from_str(fields[4].trim()).ok()?;
    if nav <= Decimal::ZERO {
        return None;
    }

    Some(NavRecord {
        code: fields[0].trim().to_string(),
        name: name.to_string(),
        nav,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const FEED: &str = "\
Scheme Code;ISIN Div Payout/ ISIN Growth;ISIN Div Reinvestment;Scheme Name;Net Asset Value;Date
119551;INF209KA12Z1;INF209KA13Z9;Aditya Birla Sun Life Banking Fund - Growth;43.51;06-Aug-2026
120503;INF846K01DP8;-;Axis Bluechip Fund - Direct Plan - Growth;58.29;06-Aug-2026
118989;INF179K01YV8;-;HDFC Mid-Cap Opportunities Fund - Growth;112.914;06-Aug-2026
";

    fn ingested() -> NavRegistry {
        let mut registry = NavRegistry::new();
        registry.ingest(FEED);
        registry
    }

    #[test]
    fn test_ingest_counts_well_formed_lines() {
        let registry = ingested();
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_ingest_skips_header_blank_and_malformed_lines() {
        let mut registry = NavRegistry::new();
        let raw = "\
Scheme Code;ISIN;ISIN;Scheme Name;Net Asset Value;Date

too;few;fields
123;x;y;No Nav Fund;N.A.;06-Aug-2026
124;x;y;Zero Nav Fund;0;06-Aug-2026
125;x;y;;12.50;06-Aug-2026
126;x;y;Good Fund;12.50;06-Aug-2026
";
        registry.ingest(raw);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("Good Fund").unwrap().nav, dec!(12.50));
    }

    #[test]
    fn test_ingest_replaces_cache_wholesale() {
        let mut registry = ingested();
        registry.ingest("200;x;y;Fresh Fund;10.00;07-Aug-2026\n");
        assert_eq!(registry.len(), 1);
        assert!(registry.resolve("Axis Bluechip Fund - Direct Plan - Growth").is_none());
        assert!(registry.resolve("Fresh Fund").is_some());
    }

    #[test]
    fn test_ingest_duplicate_name_last_write_wins() {
        let mut registry = NavRegistry::new();
        registry.ingest("1;x;y;Dup Fund;10.00;d\n2;x;y;Dup Fund;20.00;d\n");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("dup fund").unwrap().nav, dec!(20.00));
        assert_eq!(registry.resolve("dup fund").unwrap().code, "2");
    }

    #[test]
    fn test_resolve_exact_is_case_insensitive_and_trimmed() {
        let registry = ingested();
        let record = registry
            .resolve("  axis bluechip fund - direct plan - growth ")
            .expect("exact match");
        assert_eq!(record.code, "120503");
        assert_eq!(record.nav, dec!(58.29));
    }

    #[test]
    fn test_resolve_exact_beats_fuzzy() {
        // "Alpha Fund" is a substring of the earlier "Super Alpha Fund Plus",
        // but the exact entry must win.
        let mut registry = NavRegistry::new();
        registry.ingest("1;x;y;Super Alpha Fund Plus;11.00;d\n2;x;y;Alpha Fund;22.00;d\n");
        let record = registry.resolve("Alpha Fund").unwrap();
        assert_eq!(record.nav, dec!(22.00));
    }

    #[test]
    fn test_resolve_fuzzy_query_contained_in_cached_name() {
        let registry = ingested();
        let record = registry.resolve("HDFC Mid-Cap Opportunities Fund").unwrap();
        assert_eq!(record.code, "118989");
    }

    #[test]
    fn test_resolve_fuzzy_cached_name_contained_in_query() {
        let registry = ingested();
        let record = registry
            .resolve("Axis Bluechip Fund - Direct Plan - Growth (Lock-in)")
            .unwrap();
        assert_eq!(record.code, "120503");
    }

    #[test]
    fn test_resolve_fuzzy_first_match_in_feed_order() {
        let mut registry = NavRegistry::new();
        registry.ingest("1;x;y;Index Fund Nifty;10.00;d\n2;x;y;Index Fund Sensex;20.00;d\n");
        // Both contain "Index Fund"; the earlier feed line wins.
        let record = registry.resolve("Index Fund").unwrap();
        assert_eq!(record.code, "1");
    }

    #[test]
    fn test_resolve_missing_returns_none() {
        let registry = ingested();
        assert!(registry.resolve("Completely Unknown Scheme").is_none());
    }

    #[test]
    fn test_freshness_window() {
        let mut registry = NavRegistry::new();
        let t0 = Utc::now();
        assert!(!registry.is_fresh(t0));

        registry.ingest_at(FEED, t0);
        assert!(registry.is_fresh(t0));
        assert!(registry.is_fresh(t0 + Duration::hours(23)));
        assert!(!registry.is_fresh(t0 + Duration::hours(24)));
        assert!(!registry.is_fresh(t0 + Duration::hours(25)));
    }
}

//! Process configuration
//!
//! TOML file with one section per concern, every field defaulted so a
//! minimal config only needs the holdings source. Loaded once at
//! startup and treated as immutable for the process lifetime.

use anyhow::Context;
use chrono::NaiveTime;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::cadence::CadenceConfig;
use crate::error::{Result, TrackerError};
use crate::nav::feed::AMFI_NAV_URL;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DAILY_TIME: &str = "20:00";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub holdings: HoldingsConfig,
    #[serde(default)]
    pub cadence: CadenceConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    /// URL or local path of the bulk NAV listing
    #[serde(default = "default_feed_source")]
    pub source: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct HoldingsConfig {
    /// URL or local path of the holdings sheet CSV export
    #[serde(default)]
    pub source: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// HTTP mail relay endpoint; reports are skipped when unset
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_from")]
    pub from: String,
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Local wall-clock time ("HH:MM") at which the daily cycle runs
    #[serde(default = "default_daily_time")]
    pub daily_time: String,
}

fn default_feed_source() -> String {
    AMFI_NAV_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_from() -> String {
    "fundwatch@localhost".to_string()
}

fn default_daily_time() -> String {
    DEFAULT_DAILY_TIME.to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source: default_feed_source(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            daily_time: default_daily_time(),
        }
    }
}

impl FeedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl HoldingsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ReportConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The endpoint, or a config error for modes that must send
    pub fn require_endpoint(&self) -> Result<&str> {
        self.endpoint
            .as_deref()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                TrackerError::Config("report.endpoint is not set".to_string()).into()
            })
    }
}

impl ScheduleConfig {
    pub fn daily_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.daily_time, "%H:%M").map_err(|_| {
            TrackerError::Config(format!(
                "schedule.daily_time must be HH:MM, got {:?}",
                self.daily_time
            ))
            .into()
        })
    }
}

impl Config {
    /// Load from an explicit path, or from the default location.
    ///
    /// An explicit path must exist. The default path falls back to
    /// built-in defaults when no file is present; validation then
    /// reports what is missing.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = match path {
            Some(explicit) => explicit.to_path_buf(),
            None => match default_path() {
                Some(default) if default.exists() => default,
                _ => {
                    debug!("No config file found, using built-in defaults");
                    return Ok(Config::default());
                }
            },
        };

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.holdings.source.trim().is_empty() {
            return Err(
                TrackerError::Config("holdings.source is not set".to_string()).into(),
            );
        }
        self.cadence.validate()?;
        self.schedule.daily_time()?;
        Ok(())
    }
}

fn default_path() -> Option<PathBuf> {
    dir_spec::config_home().map(|dir| dir.join("fundwatch").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.feed.source, AMFI_NAV_URL);
        assert_eq!(config.feed.timeout_secs, 30);
        assert_eq!(config.cadence.weekly_day, 1);
        assert_eq!(config.cadence.monthly_date, 1);
        assert_eq!(config.cadence.quarterly_months, vec![1, 4, 7, 10]);
        assert_eq!(config.cadence.yearly_month, 1);
        assert_eq!(config.schedule.daily_time, "20:00");
        assert!(config.report.endpoint.is_none());
    }

    #[test]
    fn test_minimal_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[holdings]
source = "/tmp/holdings.csv"
"#,
        )
        .unwrap();
        assert_eq!(config.holdings.source, "/tmp/holdings.csv");
        assert_eq!(config.feed.source, AMFI_NAV_URL);
        assert_eq!(config.cadence.weekly_day, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_toml_round_trip() {
        let config: Config = toml::from_str(
            r#"
[feed]
source = "/tmp/nav.txt"
timeout_secs = 10

[holdings]
source = "https://example.com/sheet.csv"

[cadence]
weekly_day = 5
monthly_date = 15
quarterly_months = [3, 6, 9, 12]
yearly_month = 4

[report]
endpoint = "https://relay.example.com/send"
from = "reports@example.com"
to = ["me@example.com", "spouse@example.com"]

[schedule]
daily_time = "06:30"
"#,
        )
        .unwrap();
        assert_eq!(config.feed.timeout_secs, 10);
        assert_eq!(config.cadence.quarterly_months, vec![3, 6, 9, 12]);
        assert_eq!(config.report.to.len(), 2);
        assert_eq!(
            config.schedule.daily_time().unwrap(),
            NaiveTime::from_hms_opt(6, 30, 0).unwrap()
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_holdings_source() {
        let config = Config::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("holdings.source"));
    }

    #[test]
    fn test_validate_rejects_bad_daily_time() {
        let mut config = Config::default();
        config.holdings.source = "/tmp/holdings.csv".to_string();
        config.schedule.daily_time = "8pm".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_require_endpoint() {
        let mut report = ReportConfig::default();
        assert!(report.require_endpoint().is_err());

        report.endpoint = Some(String::new());
        assert!(report.require_endpoint().is_err());

        report.endpoint = Some("https://relay.example.com".to_string());
        assert_eq!(
            report.require_endpoint().unwrap(),
            "https://relay.example.com"
        );
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[holdings]\nsource = \"/tmp/h.csv\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.holdings.source, "/tmp/h.csv");
    }

    #[test]
    fn test_load_explicit_missing_path_fails() {
        assert!(Config::load(Some(Path::new("/nonexistent/config.toml"))).is_err());
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[holdings]\nsorce = \"typo\"").unwrap();
        assert!(Config::load(Some(file.path())).is_err());
    }
}

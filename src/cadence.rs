//! Report cadence rules
//!
//! Pure calendar logic deciding which periodic reports are due on a
//! given date. Yearly takes precedence over quarterly on the same
//! date; monthly fires alongside either; weekly is independent.
//! Downstream sends reports in exactly the order returned here.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::fmt;

use crate::error::{Result, TrackerError};

/// Kinds of periodic report, in dispatch precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Yearly,
    Quarterly,
    Monthly,
    Weekly,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReportKind::Yearly => "Yearly",
            ReportKind::Quarterly => "Quarterly",
            ReportKind::Monthly => "Monthly",
            ReportKind::Weekly => "Weekly",
        };
        write!(f, "{}", label)
    }
}

/// Calendar rule settings, loaded once and immutable for the process.
///
/// `weekly_day` uses 0 = Sunday .. 6 = Saturday numbering.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CadenceConfig {
    #[serde(default = "default_weekly_day")]
    pub weekly_day: u8,
    #[serde(default = "default_monthly_date")]
    pub monthly_date: u8,
    #[serde(default = "default_quarterly_months")]
    pub quarterly_months: Vec<u8>,
    #[serde(default = "default_yearly_month")]
    pub yearly_month: u8,
}

fn default_weekly_day() -> u8 {
    1 // Monday
}

fn default_monthly_date() -> u8 {
    1
}

fn default_quarterly_months() -> Vec<u8> {
    vec![1, 4, 7, 10]
}

fn default_yearly_month() -> u8 {
    1
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            weekly_day: default_weekly_day(),
            monthly_date: default_monthly_date(),
            quarterly_months: default_quarterly_months(),
            yearly_month: default_yearly_month(),
        }
    }
}

impl CadenceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.weekly_day > 6 {
            return Err(TrackerError::Config(format!(
                "weekly_day must be 0-6, got {}",
                self.weekly_day
            ))
            .into());
        }
        if !(1..=31).contains(&self.monthly_date) {
            return Err(TrackerError::Config(format!(
                "monthly_date must be 1-31, got {}",
                self.monthly_date
            ))
            .into());
        }
        if let Some(month) = self
            .quarterly_months
            .iter()
            .find(|m| !(1..=12).contains(*m))
        {
            return Err(TrackerError::Config(format!(
                "quarterly_months entries must be 1-12, got {}",
                month
            ))
            .into());
        }
        if !(1..=12).contains(&self.yearly_month) {
            return Err(TrackerError::Config(format!(
                "yearly_month must be 1-12, got {}",
                self.yearly_month
            ))
            .into());
        }
        Ok(())
    }
}

/// Reports due on `date`, in the order they must be sent:
/// at most one of yearly/quarterly, then monthly, then weekly.
pub fn due_reports(date: NaiveDate, cfg: &CadenceConfig) -> Vec<ReportKind> {
    let day = date.day() as u8;
    let month = date.month() as u8;
    let weekday = date.weekday().num_days_from_sunday() as u8;

    let mut due = Vec::new();

    let yearly = day == cfg.monthly_date && month == cfg.yearly_month;
    let quarterly =
        day == cfg.monthly_date && cfg.quarterly_months.contains(&month) && !yearly;

    if yearly {
        due.push(ReportKind::Yearly);
    } else if quarterly {
        due.push(ReportKind::Quarterly);
    }
    if day == cfg.monthly_date {
        due.push(ReportKind::Monthly);
    }
    if weekday == cfg.weekly_day {
        due.push(ReportKind::Weekly);
    }

    due
}

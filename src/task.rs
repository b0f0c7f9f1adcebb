//! Daily task orchestration
//!
//! One cycle: read holdings, value the portfolio (refreshing NAV data
//! when stale), log the summary, decide which reports are due, and
//! dispatch them. The daemon fires the cycle at a fixed local time
//! each day and shuts down only between cycles.

use anyhow::Result;
use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveTime};
use itertools::Itertools;
use tracing::{error, info, warn};

use crate::cadence::due_reports;
use crate::config::Config;
use crate::holdings::sheet::SheetClient;
use crate::nav::feed::FeedClient;
use crate::nav::NavRegistry;
use crate::report::{dispatch, ReportSender};
use crate::utils::{format_currency, format_percent};
use crate::valuation::{calculate_portfolio, PortfolioSnapshot};

/// Run one valuation-and-report cycle.
///
/// A transport failure (holdings sheet or NAV feed) aborts the cycle;
/// everything else is captured inside the snapshot. With no sender,
/// due reports are decided and logged but not delivered.
pub async fn run_cycle(
    registry: &mut NavRegistry,
    config: &Config,
    sender: Option<&dyn ReportSender>,
) -> Result<PortfolioSnapshot> {
    info!("Running daily portfolio check");

    let sheet = SheetClient::new(&config.holdings.source, config.holdings.timeout());
    let holdings = sheet.read_holdings().await?;

    let feed = FeedClient::new(&config.feed.source, config.feed.timeout());
    let snapshot = calculate_portfolio(registry, &feed, &holdings).await?;

    info!(
        "Portfolio calculated: total {} | equity {} | debt {} | {} holdings",
        format_currency(snapshot.total_value),
        format_percent(snapshot.equity_percent),
        format_percent(snapshot.debt_percent),
        snapshot.holdings_count
    );
    for message in &snapshot.errors {
        warn!("{}", message);
    }

    let due = due_reports(snapshot.date.date_naive(), &config.cadence);
    if due.is_empty() {
        info!("No reports scheduled for today");
    } else {
        info!(
            "Reports due: {}",
            due.iter().map(|kind| kind.to_string()).join(", ")
        );
        match sender {
            Some(sender) => {
                let delivered = dispatch(sender, &snapshot, &due).await;
                info!("{}/{} reports delivered", delivered, due.len());
            }
            None => warn!(
                "No report sender configured, skipping {} due report(s)",
                due.len()
            ),
        }
    }

    Ok(snapshot)
}

/// Run the cycle at `schedule.daily_time` every day until ctrl-c.
///
/// The NAV cache lives across cycles, so a same-day re-run after a
/// transient failure reuses the last successful ingest. A failed cycle
/// is logged and the loop keeps going.
pub async fn run_daemon(config: &Config, sender: &dyn ReportSender) -> Result<()> {
    let daily_time = config.schedule.daily_time()?;

    info!("Scheduler running; daily cycle at {}", config.schedule.daily_time);
    info!(
        "Cadence: weekly day {} | monthly date {} | quarterly months {} | yearly month {}",
        config.cadence.weekly_day,
        config.cadence.monthly_date,
        config.cadence.quarterly_months.iter().join(","),
        config.cadence.yearly_month
    );

    let mut registry = NavRegistry::new();

    loop {
        let delay = next_fire_delay(Local::now(), daily_time)
            .to_std()
            .unwrap_or_default();
        info!("Next cycle in {}s", delay.as_secs());

        tokio::select! {
            _ = tokio::time::sleep(delay) => {
                if let Err(e) = run_cycle(&mut registry, config, Some(sender)).await {
                    error!("Daily cycle failed: {:#}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested, exiting");
                return Ok(());
            }
        }
    }
}

/// Time until the next occurrence of `at` local wall-clock time.
/// If `at` has already passed today, that is tomorrow's occurrence.
pub fn next_fire_delay(now: DateTime<Local>, at: NaiveTime) -> ChronoDuration {
    let now_naive = now.naive_local();
    let today_candidate = now.date_naive().and_time(at);

    let next = if today_candidate > now_naive {
        today_candidate
    } else {
        today_candidate + ChronoDuration::days(1)
    };

    next - now_naive
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Local
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(y, m, d)
                    .unwrap()
                    .and_hms_opt(h, min, 0)
                    .unwrap(),
            )
            .unwrap()
    }

    #[test]
    fn test_next_fire_later_today() {
        let now = local(2026, 8, 6, 10, 0);
        let at = NaiveTime::from_hms_opt(20, 0, 0).unwrap();
        assert_eq!(next_fire_delay(now, at), ChronoDuration::hours(10));
    }

    #[test]
    fn test_next_fire_rolls_to_tomorrow() {
        let now = local(2026, 8, 6, 21, 30);
        let at = NaiveTime::from_hms_opt(20, 0, 0).unwrap();
        assert_eq!(next_fire_delay(now, at), ChronoDuration::hours(22) + ChronoDuration::minutes(30));
    }

    #[test]
    fn test_next_fire_exact_time_rolls_to_tomorrow() {
        let now = local(2026, 8, 6, 20, 0);
        let at = NaiveTime::from_hms_opt(20, 0, 0).unwrap();
        assert_eq!(next_fire_delay(now, at), ChronoDuration::days(1));
    }
}

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use fundwatch::config::Config;
use fundwatch::nav::NavRegistry;
use fundwatch::report::relay::RelaySender;
use fundwatch::report::ReportSender;
use fundwatch::task::{run_cycle, run_daemon};
use fundwatch::utils::{format_currency, format_percent};
use fundwatch::valuation::PortfolioSnapshot;

#[derive(Parser)]
#[command(name = "fundwatch")]
#[command(
    version,
    about = "Mutual fund portfolio tracker with scheduled reports"
)]
#[command(
    long_about = "Values your mutual fund and direct holdings against the AMFI daily NAV feed, and sends weekly/monthly/quarterly/yearly reports on a calendar cadence."
)]
struct Cli {
    /// Path to the config file (default: XDG config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the daily scheduler (default)
    Run,

    /// Run one valuation cycle and exit (for CI/cron triggers)
    RunOnce,

    /// Verify the report relay and run one cycle
    Test,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let sender = build_sender(&config)?;
            run_daemon(&config, &sender).await
        }

        Commands::RunOnce => {
            // Reports are optional here: without an endpoint the cycle
            // still values and prints, it just doesn't send.
            let sender = if config.report.endpoint.is_some() {
                Some(build_sender(&config)?)
            } else {
                info!("No report.endpoint configured; reports will not be sent");
                None
            };

            let mut registry = NavRegistry::new();
            let snapshot = run_cycle(
                &mut registry,
                &config,
                sender.as_ref().map(|s| s as &dyn ReportSender),
            )
            .await?;
            print_summary(&snapshot);
            Ok(())
        }

        Commands::Test => {
            let sender = build_sender(&config)?;
            sender.verify().await?;
            println!("{} Report relay is reachable", "✓".green().bold());

            let mut registry = NavRegistry::new();
            let snapshot = run_cycle(&mut registry, &config, Some(&sender)).await?;
            print_summary(&snapshot);
            println!("\n{} Test completed", "✓".green().bold());
            Ok(())
        }
    }
}

fn build_sender(config: &Config) -> Result<RelaySender> {
    let endpoint = config.report.require_endpoint()?;
    RelaySender::new(
        endpoint,
        config.report.from.clone(),
        config.report.to.clone(),
        config.report.timeout(),
    )
}

/// Console summary for run-once / test modes
fn print_summary(snapshot: &PortfolioSnapshot) {
    use tabled::{settings::Style, Table, Tabled};

    println!("\n{} Portfolio calculated", "✓".green().bold());
    println!("  Total Value: {}", format_currency(snapshot.total_value).bold());
    println!("  Equity: {}", format_percent(snapshot.equity_percent));
    println!("  Debt: {}", format_percent(snapshot.debt_percent));
    println!("  Holdings: {} schemes\n", snapshot.holdings_count);

    if !snapshot.errors.is_empty() {
        println!("{} Warnings: {}", "⚠".yellow().bold(), snapshot.errors.len());
        for message in &snapshot.errors {
            println!("  - {}", message.yellow());
        }
        println!();
    }

    #[derive(Tabled)]
    struct HoldingRow {
        #[tabled(rename = "Scheme Name")]
        scheme: String,
        #[tabled(rename = "Units")]
        units: String,
        #[tabled(rename = "NAV")]
        nav: String,
        #[tabled(rename = "Value")]
        value: String,
        #[tabled(rename = "Category")]
        category: String,
    }

    let rows: Vec<HoldingRow> = snapshot
        .details
        .iter()
        .map(|detail| HoldingRow {
            scheme: detail.scheme_name.clone(),
            units: detail
                .units
                .map(|u| format!("{:.2}", u))
                .unwrap_or_else(|| "-".to_string()),
            nav: match (detail.nav, detail.units) {
                (Some(nav), _) => format_currency(nav),
                (None, Some(_)) => "N/A".to_string(),
                (None, None) => "-".to_string(),
            },
            value: detail
                .value
                .map(format_currency)
                .unwrap_or_else(|| "N/A".to_string()),
            category: detail.category.to_string(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

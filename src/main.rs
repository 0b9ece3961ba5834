use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use school_dashboard::aggregate::DashboardView;
use school_dashboard::filter::{FilterPredicate, Selector};
use school_dashboard::models::SchoolType;
use school_dashboard::{report, Dashboard};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "school-dashboard")]
#[command(about = "Filter student records and compute school performance chart data", long_about = None)]
struct Cli {
    /// CSV file with one student record per row
    #[arg(long, global = true, env = "DASHBOARD_DATA", default_value = "base de donne.csv")]
    data: PathBuf,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Default)]
struct FilterArgs {
    /// Zone to keep, or "all"
    #[arg(long)]
    zone: Option<String>,
    /// School type to keep ("Public", "Privé"), or "all"
    #[arg(long)]
    school_type: Option<String>,
    /// Gender to keep, or "all"
    #[arg(long)]
    gender: Option<String>,
}

impl FilterArgs {
    fn predicate(&self) -> FilterPredicate {
        FilterPredicate::from_options(
            self.zone.as_deref(),
            self.school_type.as_deref(),
            self.gender.as_deref(),
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the values each filter accepts
    Options,
    /// Print every chart aggregate as JSON
    View {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        pretty: bool,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Read filter changes from stdin and print a JSON view after each one
    Session,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn to_json(view: &DashboardView, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(view)?
    } else {
        serde_json::to_string(view)?
    };
    Ok(json)
}

/// One line of session input, e.g. `zone Rabat` or `reset`.
enum SessionEvent {
    Zone(String),
    SchoolType(String),
    Gender(String),
    Reset,
    Quit,
}

fn parse_event(line: &str) -> Option<SessionEvent> {
    let line = line.trim();
    let (command, value) = match line.split_once(char::is_whitespace) {
        Some((command, value)) => (command, value.trim()),
        None => (line, ""),
    };

    match (command, value) {
        ("reset", _) => Some(SessionEvent::Reset),
        ("quit" | "exit", _) => Some(SessionEvent::Quit),
        (_, "") => None,
        ("zone", value) => Some(SessionEvent::Zone(value.to_string())),
        ("school-type", value) => Some(SessionEvent::SchoolType(value.to_string())),
        ("gender", value) => Some(SessionEvent::Gender(value.to_string())),
        _ => None,
    }
}

async fn run_session(dashboard: &mut Dashboard) -> anyhow::Result<()> {
    println!("{}", to_json(&dashboard.render()?, false)?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let mut predicate = dashboard.predicate().clone();
        match parse_event(&line) {
            Some(SessionEvent::Zone(value)) => predicate.zone = Selector::<String>::parse(&value),
            Some(SessionEvent::SchoolType(value)) => {
                predicate.school_type = Selector::<SchoolType>::parse(&value)
            }
            Some(SessionEvent::Gender(value)) => {
                predicate.gender = Selector::<String>::parse(&value)
            }
            Some(SessionEvent::Reset) => predicate = FilterPredicate::default(),
            Some(SessionEvent::Quit) => break,
            None => {
                warn!(input = %line.trim(), "unrecognised session command");
                continue;
            }
        }

        dashboard.apply_filters(predicate);
        println!("{}", to_json(&dashboard.render()?, false)?);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut dashboard = Dashboard::load(&cli.data)
        .await
        .with_context(|| format!("failed to load dashboard data from {}", cli.data.display()))?;

    match cli.command {
        Commands::Options => {
            let options = dashboard.options();
            println!("zone: {}", options.zone.join(", "));
            println!("school-type: {}", options.school_type.join(", "));
            println!("gender: {}", options.gender.join(", "));
        }
        Commands::View { filters, pretty } => {
            dashboard.apply_filters(filters.predicate());
            println!("{}", to_json(&dashboard.render()?, pretty)?);
        }
        Commands::Report { filters, out } => {
            dashboard.apply_filters(filters.predicate());
            let view = dashboard.render()?;
            let report = report::build_report(
                dashboard.predicate(),
                dashboard.active_len(),
                dashboard.records().len(),
                &view,
                chrono::Utc::now(),
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
            println!("{}", report::headline(&view));
        }
        Commands::Session => run_session(&mut dashboard).await?,
    }

    Ok(())
}

//! CLI entry point for the bikeshare explorer.
//!
//! Runs the interactive exploration session by default, and provides
//! one-shot subcommands for reports, raw record pages and dataset discovery.

use anyhow::{Result, ensure};
use bikeshare_explorer::city::City;
use bikeshare_explorer::config::CityCatalog;
use bikeshare_explorer::filter::FilterSpec;
use bikeshare_explorer::output::{
    append_record, print_pretty, render_records, render_report, write_json,
};
use bikeshare_explorer::session::{LinePrompter, Session};
use bikeshare_explorer::stats::{DEFAULT_PAGE_SIZE, RecordBrowser, Report};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_explorer")]
#[command(about = "Explore US bikeshare trip data", long_about = None)]
struct Cli {
    /// Directory holding the city CSV files [default: $BIKESHARE_DATA_DIR or .]
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// JSON file overriding the dataset file name per city
    #[arg(long, global = true, value_name = "FILE")]
    cities: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct Selection {
    /// City to analyze: chicago, new york or washington
    #[arg(short, long)]
    city: String,

    /// Only trips starting in this month (January to June)
    #[arg(short, long, conflicts_with = "day")]
    month: Option<String>,

    /// Only trips starting on this day of the week
    #[arg(short, long)]
    day: Option<String>,
}

impl Selection {
    fn filter(&self) -> Result<FilterSpec> {
        let filter = match (&self.month, &self.day) {
            (Some(month), _) => FilterSpec::by_month(month)?,
            (None, Some(day)) => FilterSpec::by_day(day)?,
            (None, None) => FilterSpec::NoFilter,
        };
        Ok(filter)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive exploration (the default)
    Explore {
        /// Raw records shown per page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
    /// Print all statistics for one city and filter
    Report {
        #[command(flatten)]
        selection: Selection,

        /// Print the report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,

        /// CSV file to append a summary row to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print one page of raw trip records
    Browse {
        #[command(flatten)]
        selection: Selection,

        /// Zero-based page number
        #[arg(short, long, default_value_t = 0)]
        page: usize,

        /// Records per page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
    /// Show the dataset file resolved for each city
    ListCities,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bikeshare_explorer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_explorer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    // Prompts share stderr's terminal, so only warnings and errors go there by default.
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", LevelFilter::WARN));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let catalog = build_catalog(cli.data_dir, cli.cities.as_deref())?;

    match cli.command.unwrap_or(Commands::Explore {
        page_size: DEFAULT_PAGE_SIZE,
    }) {
        Commands::Explore { page_size } => {
            ensure!(page_size > 0, "--page-size must be at least 1");
            Session::new(&catalog, LinePrompter::new()?, std::io::stdout())
                .with_page_size(page_size)
                .run()?;
        }
        Commands::Report {
            selection,
            json,
            output,
        } => {
            let city: City = selection.city.parse()?;
            let filter = selection.filter()?;
            let records = catalog.load_city(city)?;
            let report = Report::build(city, &records, filter)?;
            print_pretty(&report);

            if json {
                write_json(&mut std::io::stdout().lock(), &report)?;
            } else {
                print!("{}", render_report(&report));
            }

            if let Some(path) = output {
                append_record(&path, &report.summary())?;
                info!(path = %path.display(), "Summary row appended");
            }
        }
        Commands::Browse {
            selection,
            page,
            page_size,
        } => {
            ensure!(page_size > 0, "--page-size must be at least 1");
            let city: City = selection.city.parse()?;
            let filter = selection.filter()?;
            let records = catalog.load_city(city)?;
            let view = filter.apply(&records);

            let mut browser = RecordBrowser::at_page(&view, page, page_size);
            let first = browser.position();
            let rows = browser.next_page(page_size);
            if rows.is_empty() {
                println!(
                    "No records on page {page}: {} trips selected ({} per page)",
                    view.len(),
                    page_size
                );
            } else {
                print!("{}", render_records(rows, first));
            }
        }
        Commands::ListCities => {
            for (city, path) in catalog.entries() {
                let status = if path.exists() { "found" } else { "missing" };
                println!("{:<12} {} ({status})", city.as_str(), path.display());
            }
        }
    }

    Ok(())
}

/// Reads filter directives from `var`, falling back to `default` when it is unset.
fn env_filter(var: &str, default: LevelFilter) -> EnvFilter {
    parse_filter(std::env::var(var).ok().as_deref(), default)
}

fn parse_filter(directives: Option<&str>, default: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .parse_lossy(directives.unwrap_or_default())
}

/// Builds the city catalog from `--data-dir` (or the environment) and optional overrides.
fn build_catalog(data_dir: Option<PathBuf>, overrides: Option<&Path>) -> Result<CityCatalog> {
    let catalog = match data_dir {
        Some(dir) => CityCatalog::new(dir),
        None => CityCatalog::from_env(),
    };
    let catalog = match overrides {
        Some(path) => catalog.with_overrides_file(path)?,
        None => catalog,
    };
    info!(data_dir = %catalog.data_dir().display(), "City catalog ready");
    Ok(catalog)
}

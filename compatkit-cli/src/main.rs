//! Compatkit - browser feature support lookups backed by the caniuse dataset
//!
//! Two commands: `update` refreshes the upstream checkout and rebuilds the
//! normalized records, `query` answers feature lookups from them.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use compatkit_core::config::{DataPaths, DATA_DIR_ENV};
use compatkit_core::ingest::{self, IngestOptions, IngestOutcome};
use compatkit_core::query::{respond, BrowserFilter, OutputFormat, QueryOptions, QueryResponse};
use compatkit_core::store::FeatureStore;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Output format choices on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Html,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => OutputFormat::Json,
            Format::Html => OutputFormat::Html,
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "compatkit",
    about = "Browser feature support data from the caniuse dataset",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Set log level
    #[clap(long, default_value = "info", global = true)]
    log_level: LogLevel,

    /// Data directory root (defaults to $COMPATKIT_DATA_DIR)
    #[clap(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
enum Command {
    /// Refresh the upstream dataset and rebuild the normalized records
    Update {
        /// Normalize even when the checkout was already up to date
        #[clap(long)]
        force: bool,
    },

    /// Look up support data for one feature
    Query {
        /// Feature id, e.g. "flexbox"
        feature: String,

        /// Browser ids (comma-separated), or "all" for every browser in the record
        #[clap(long, value_delimiter = ',')]
        browsers: Vec<String>,

        /// How many versions to include per browser
        #[clap(long)]
        versions: Option<usize>,

        /// Output format
        #[clap(long, value_enum, default_value = "json")]
        format: Format,
    },
}

/// Initialize tracing with CLI flags
fn initialize_tracing(log_level: &LogLevel) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level.to_filter_directive()))
        .with_target(false)
        .with_writer(std::io::stderr) // Logs go to stderr; stdout carries responses
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level);

    let paths = match cli.data_dir {
        Some(root) => DataPaths::resolve(root),
        None => match DataPaths::from_env() {
            Ok(paths) => paths,
            Err(e) => {
                error!("Fatal: no data directory configured: {:#}", e);
                eprintln!("\nError: no data directory configured.");
                eprintln!("Pass --data-dir or set {DATA_DIR_ENV}.");
                std::process::exit(1);
            }
        },
    };

    match cli.command {
        Command::Update { force } => update_command(paths, force).await,
        Command::Query {
            feature,
            browsers,
            versions,
            format,
        } => query_command(paths, feature, browsers, versions, format).await,
    }
}

async fn update_command(paths: DataPaths, force: bool) -> Result<()> {
    match ingest::run(&paths, &IngestOptions { force }).await? {
        IngestOutcome::Skipped => {
            println!("Dataset already up to date.");
        }
        IngestOutcome::Completed(report) => {
            println!(
                "Normalized {} features into {}",
                report.processed,
                paths.normalized.display()
            );
            if !report.failed.is_empty() {
                eprintln!("\n{} features failed to normalize:", report.failed.len());
                for (feature, reason) in &report.failed {
                    eprintln!("  {feature}: {reason}");
                }
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn query_command(
    paths: DataPaths,
    feature: String,
    browsers: Vec<String>,
    versions: Option<usize>,
    format: Format,
) -> Result<()> {
    debug!("Serving queries from {:?}", paths.normalized);
    let store = FeatureStore::open(&paths.normalized);

    let options = QueryOptions {
        feature: feature.clone(),
        browsers: browser_filter(browsers),
        versions,
        format: format.into(),
    };

    match respond(&store, options).await {
        QueryResponse::Json(body) => {
            println!("{}", serde_json::to_string(&body)?);
        }
        QueryResponse::Html(html) => {
            println!("{html}");
        }
        QueryResponse::NotFound => {
            eprintln!("Feature '{feature}' not found. Run `compatkit update` if the dataset is stale.");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Map the repeatable `--browsers` flag onto the query-option filter.
fn browser_filter(browsers: Vec<String>) -> BrowserFilter {
    if browsers.is_empty() {
        BrowserFilter::Unspecified
    } else if browsers.len() == 1 && browsers[0] == "all" {
        BrowserFilter::All
    } else {
        BrowserFilter::List(browsers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_filter_mapping() {
        assert_eq!(browser_filter(Vec::new()), BrowserFilter::Unspecified);
        assert_eq!(
            browser_filter(vec!["all".to_string()]),
            BrowserFilter::All
        );
        assert_eq!(
            browser_filter(vec!["chrome".to_string(), "ie".to_string()]),
            BrowserFilter::List(vec!["chrome".to_string(), "ie".to_string()])
        );
        // "all" mixed with explicit ids is treated as a plain list.
        assert_eq!(
            browser_filter(vec!["all".to_string(), "chrome".to_string()]),
            BrowserFilter::List(vec!["all".to_string(), "chrome".to_string()])
        );
    }
}

//! CLI entry point for the hub demographics report.
//!
//! Provides subcommands for producing the per-hub summary table, listing the
//! configured hubs, and fetching a single census table into the cache.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use hub_demographics::{
    analyzers::aggregate::aggregate_hub,
    config::HubConfig,
    fetch::BasicClient,
    infra::{CachedApi, CensusReporterClient, ResponseCache, censusreporter::CENSUS_REPORTER_URL},
    output::{HubRow, append_record, print_json, print_row},
    services::census_api::CensusApi,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

type Api = CachedApi<CensusReporterClient<BasicClient>>;

#[derive(Parser)]
#[command(name = "hub_demographics")]
#[command(about = "Summarize census demographics for multi-county hubs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where census data comes from.
#[derive(Args)]
struct SourceArgs {
    /// Directory holding cached census responses
    #[arg(long, env = "CENSUS_CACHE_DIR", default_value = "./cache")]
    cache_dir: PathBuf,

    /// Census reporter `data/show` endpoint
    #[arg(long, env = "CENSUS_BASE_URL", default_value = CENSUS_REPORTER_URL)]
    base_url: String,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,
}

impl SourceArgs {
    fn build_api(&self) -> Result<Api> {
        let http = BasicClient::with_timeout(Duration::from_secs(self.timeout_secs))?;
        let client = CensusReporterClient::new(http, &self.base_url)?;
        Ok(CachedApi::new(client, ResponseCache::new(&self.cache_dir)))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print one comma-separated summary row per hub
    Report {
        #[command(flatten)]
        source: SourceArgs,

        /// TOML file of [[hub]] tables replacing the built-in hub list
        #[arg(long)]
        hubs_file: Option<PathBuf>,

        /// Only report these hubs (repeatable)
        #[arg(long = "hub", value_name = "NAME")]
        hubs: Vec<String>,

        /// Also append rows to this CSV file
        #[arg(short, long)]
        output: Option<String>,

        /// Maximum number of geographies fetched at once
        #[arg(short, long, default_value_t = 1)]
        concurrency: usize,

        /// Stop at the first hub that fails instead of moving on
        #[arg(long, default_value_t = false)]
        fail_fast: bool,
    },
    /// List the configured hubs
    ListHubs {
        /// TOML file of [[hub]] tables replacing the built-in hub list
        #[arg(long)]
        hubs_file: Option<PathBuf>,
    },
    /// Fetch one census table for one geography into the cache
    Fetch {
        #[command(flatten)]
        source: SourceArgs,

        /// Census table code, e.g. B01001
        table_id: String,

        /// Census reporter geography id, e.g. 04000US39
        geo_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/hub_demographics.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("hub_demographics.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            source,
            hubs_file,
            hubs,
            output,
            concurrency,
            fail_fast,
        } => {
            let config = load_hubs(hubs_file.as_deref())?.select(&hubs)?;
            warn_overlaps(&config);
            let api = Arc::new(source.build_api()?);
            report(api, &config, output.as_deref(), concurrency, fail_fast).await?;
        }
        Commands::ListHubs { hubs_file } => {
            let config = load_hubs(hubs_file.as_deref())?;

            for hub in &config.hubs {
                info!(hub = %hub.name, geographies = hub.geo_ids.len(), "Hub");
            }
            info!(total = config.hubs.len(), "Hub list summary");
            warn_overlaps(&config);
        }
        Commands::Fetch {
            source,
            table_id,
            geo_id,
        } => {
            let api = source.build_api()?;
            let table = api.fetch_table(&table_id, &geo_id).await?;

            let mut geographies: Vec<_> = table.estimates.keys().map(String::as_str).collect();
            geographies.sort_unstable();
            info!(
                table_id = %table.id,
                title = %table.title,
                columns = table.columns.len(),
                geographies = ?geographies,
                cache = %api.cache.path(&table_id, &geo_id).display(),
                "Table fetched"
            );
        }
    }

    Ok(())
}

fn load_hubs(path: Option<&Path>) -> Result<HubConfig> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading hubs file");
            HubConfig::load(path)
        }
        None => Ok(HubConfig::builtin()),
    }
}

fn warn_overlaps(config: &HubConfig) {
    for (geo_id, hubs) in config.overlapping_geographies() {
        warn!(geo_id, hubs = ?hubs, "Geography belongs to more than one hub");
    }
}

/// Aggregates each hub in order and prints its row as soon as it is ready.
///
/// A failing hub is logged and skipped unless `fail_fast` is set; either way
/// the run ends in an error if any hub failed.
#[tracing::instrument(skip(api, config), fields(hubs = config.hubs.len()))]
async fn report(
    api: Arc<Api>,
    config: &HubConfig,
    output: Option<&str>,
    concurrency: usize,
    fail_fast: bool,
) -> Result<()> {
    let mut failed = Vec::new();

    for hub in &config.hubs {
        let hub_span = tracing::info_span!("hub", hub = %hub.name);

        match aggregate_hub(api.clone(), hub, concurrency)
            .instrument(hub_span)
            .await
        {
            Ok(totals) => {
                print_json(&totals)?;
                let row = HubRow::from_totals(&totals);
                print_row(&row)?;
                if let Some(path) = output {
                    append_record(path, &row)?;
                }
            }
            Err(e) => {
                error!(hub = %hub.name, error = %format!("{e:#}"), "Hub aggregation failed");
                if fail_fast {
                    return Err(e.context(format!("hub {}", hub.name)));
                }
                failed.push(hub.name.as_str());
            }
        }
    }

    if !failed.is_empty() {
        anyhow::bail!(
            "{} of {} hubs failed: {}",
            failed.len(),
            config.hubs.len(),
            failed.join(", ")
        );
    }

    info!("Report complete");
    Ok(())
}

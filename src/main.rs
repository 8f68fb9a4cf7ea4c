use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use flight_averages::{
    ClientConfig, InMemoryRecordStore, RecordStore, SearchOrchestrator, SearchParams,
    SkyPickerClient, SqliteRecordStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Average flight and baggage prices per destination for an airport pair
#[derive(Debug, Parser)]
#[clap(name = "flight-averages")]
pub struct Args {
    /// Origin code; replaced by the validated pair before searching
    #[clap(long, default_value = "")]
    pub fly_from: String,

    /// Two comma-separated airport codes, e.g. "OPO,LIS"
    #[clap(long)]
    pub fly_to: String,

    /// Currency of the returned prices
    #[clap(long, default_value = "EUR")]
    pub currency: String,

    /// First departure date (dd/mm/yyyy)
    #[clap(long)]
    pub date_from: String,

    /// Last departure date (dd/mm/yyyy)
    #[clap(long)]
    pub date_to: String,

    /// Supplier API base URL
    #[clap(long, env = "SKYPICKER_BASE_URL", default_value = "https://api.skypicker.com")]
    pub base_url: String,

    /// Supplier API key, sent as the `apikey` header
    #[clap(long, env = "SKYPICKER_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Supplier partner id
    #[clap(long, default_value = "picky")]
    pub partner: String,

    /// Request timeout in milliseconds
    #[clap(long, default_value_t = 10000)]
    pub timeout_ms: u64,

    /// SQLite file for search records; in-memory when omitted
    #[clap(long, env = "FLIGHT_RECORDS_DB")]
    pub database: Option<PathBuf>,
}

impl Args {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            partner: self.partner.clone(),
            timeout_ms: self.timeout_ms,
            ..ClientConfig::default()
        }
    }

    fn search_params(&self) -> SearchParams {
        SearchParams::new(&self.fly_to, &self.currency, &self.date_from, &self.date_to)
            .with_fly_from(&self.fly_from)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flight_averages=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let client = Arc::new(
        SkyPickerClient::new(args.client_config()).context("Failed to build supplier client")?,
    );
    let store: Arc<dyn RecordStore> = match &args.database {
        Some(path) => Arc::new(
            SqliteRecordStore::open(path)
                .with_context(|| format!("Failed to open record store {}", path.display()))?,
        ),
        None => Arc::new(InMemoryRecordStore::new()),
    };

    let orchestrator = SearchOrchestrator::new(client.clone(), client, store);

    match orchestrator.filter_flights(args.search_params()).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}", serde_json::to_string_pretty(&e.to_response())?);
            Ok(ExitCode::FAILURE)
        }
    }
}

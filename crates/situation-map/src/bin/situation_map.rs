use std::io;
use std::path::PathBuf;
use std::time::Duration;

use alert_core::{AlertFeed, RegionCatalog};
use alert_feed::{FeedConfig, JsonCatalog, ReplayFeed, SseAlertFeed};
use arrival_tracker::ExpiryMode;
use clap::{Parser, ValueEnum};
use situation_map::{
    JsonLinesSink, OutputFormat, SituationConfig, SituationError, SituationMap,
    SituationProcessor, StopReason,
};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Frame,
    Geojson,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Expiry {
    Coalesced,
    PerBatch,
}

#[derive(Debug, Parser)]
#[command(name = "situation-map")]
#[command(about = "Merge live alert regions into map shapes and stream render frames as JSON lines")]
struct Args {
    /// Region catalog (polygons.json). Falls back to SITUATION_CATALOG_PATH env.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// SSE endpoint of the alert feed. Falls back to SITUATION_FEED_URL env.
    #[arg(long)]
    feed_url: Option<String>,

    /// Realtime database base URL; subscribes to its active alerts
    #[arg(long, conflicts_with = "feed_url")]
    database_url: Option<String>,

    /// Replay a JSON-lines recording instead of a live feed
    #[arg(long, conflicts_with_all = ["feed_url", "database_url"])]
    replay: Option<PathBuf>,

    /// Delay between replayed snapshots in milliseconds
    #[arg(long, default_value_t = 0)]
    replay_interval_ms: u64,

    /// Highlight window in milliseconds. Falls back to SITUATION_HIGHLIGHT_MS env.
    #[arg(long)]
    highlight_ms: Option<u64>,

    /// Highlight expiry mode. Falls back to SITUATION_EXPIRY_MODE env.
    #[arg(long, value_enum)]
    expiry_mode: Option<Expiry>,

    /// Output encoding
    #[arg(long, value_enum, default_value = "frame")]
    format: Format,
}

impl Args {
    fn apply_to(&self, config: &mut SituationConfig) {
        if let Some(path) = &self.catalog {
            config.catalog_path = path.clone();
        }
        if let Some(url) = &self.feed_url {
            config.feed = Some(self.feed_with_url(config, url.clone()));
        }
        if let Some(db) = &self.database_url {
            let reconnect = config.feed.as_ref().map(|f| f.reconnect.clone());
            let mut feed = FeedConfig::for_database(db);
            if let Some(reconnect) = reconnect {
                feed = feed.with_reconnect(reconnect);
            }
            config.feed = Some(feed);
        }
        if let Some(ms) = self.highlight_ms {
            config.tracker.highlight_window = Duration::from_millis(ms);
        }
        if let Some(mode) = self.expiry_mode {
            config.tracker.expiry_mode = match mode {
                Expiry::Coalesced => ExpiryMode::Coalesced,
                Expiry::PerBatch => ExpiryMode::PerBatch,
            };
        }
    }

    fn feed_with_url(&self, config: &SituationConfig, url: String) -> FeedConfig {
        match &config.feed {
            Some(existing) => FeedConfig {
                url,
                reconnect: existing.reconnect.clone(),
            },
            None => FeedConfig::new(url),
        }
    }

    fn output_format(&self) -> OutputFormat {
        match self.format {
            Format::Frame => OutputFormat::Frame,
            Format::Geojson => OutputFormat::GeoJson,
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    // Frames go to stdout, logs to stderr.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = SituationConfig::from_env()?;
    args.apply_to(&mut config);

    let catalog = JsonCatalog::from_path(&config.catalog_path)?;
    if catalog.is_empty() {
        info!("Region catalog is empty, no shapes will be drawn");
    }

    let feed: Box<dyn AlertFeed> = match (&args.replay, &config.feed) {
        (Some(path), _) => {
            let mut replay = ReplayFeed::from_path(path)?;
            if args.replay_interval_ms > 0 {
                replay = replay.with_interval(Duration::from_millis(args.replay_interval_ms));
            }
            Box::new(replay)
        }
        (None, Some(feed_config)) => Box::new(SseAlertFeed::new(feed_config.clone())?),
        (None, None) => return Err(SituationError::NoFeed.into()),
    };

    info!(
        "situation-map {} with {} regions, feed {}",
        situation_map::version(),
        catalog.len(),
        feed.name()
    );

    let map = SituationMap::new(catalog, &config);
    let sink = JsonLinesSink::new(io::stdout(), args.output_format());
    let mut processor = SituationProcessor::new(feed, map, sink);

    let summary = processor.run_with_shutdown(shutdown_signal()).await?;
    match summary.stop {
        StopReason::Shutdown => info!("Stopped by signal"),
        StopReason::StreamEnded => info!("Feed ended"),
    }

    Ok(())
}

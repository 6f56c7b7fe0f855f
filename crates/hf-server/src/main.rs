//! Haiku feed generator binary.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use hf_core::{FeedConfig, SystemClock};
use hf_haiku::HaikuExtractor;
use hf_ingest::{source, Ingestor, RetentionPolicy, Subscription};
use hf_server::{app_with_state, AppState};
use hf_store::{CursorStore, FileCursorStore, FilePostStore, MemoryCursorStore, MemoryPostStore, PostReader, PostStore};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Bluesky feed generator that surfaces posts scanning as 5-7-5 haiku.
#[derive(Parser)]
#[command(name = "haiku-feed")]
#[command(version)]
struct Args {
    /// JSON configuration file; defaults plus HAIKU_FEED_* variables otherwise.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    host: Option<String>,

    #[arg(short, long)]
    port: Option<u16>,

    /// Persist posts and the stream cursor under this directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Newline-delimited JSON batches to ingest before and while serving.
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Log every accepted haiku.
    #[arg(long)]
    debug_haiku: bool,

    #[arg(long, default_value = "info")]
    log_level: String,

    #[arg(long)]
    json_logs: bool,
}

fn setup_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(filter);
    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn load_config(args: &Args) -> anyhow::Result<FeedConfig> {
    let mut config = match &args.config {
        Some(path) => FeedConfig::load(path).with_context(|| format!("load {}", path.display()))?,
        None => FeedConfig::from_env()?,
    };
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = &args.data_dir {
        config.storage.data_dir = Some(dir.clone());
    }
    if args.debug_haiku {
        config.ingest.debug_haiku = true;
    }
    config.validate()?;
    Ok(config)
}

struct Stores {
    writer: Arc<dyn PostStore>,
    reader: Arc<dyn PostReader>,
    cursors: Arc<dyn CursorStore>,
}

fn open_stores(config: &FeedConfig) -> anyhow::Result<Stores> {
    match &config.storage.data_dir {
        Some(dir) => {
            let posts = Arc::new(FilePostStore::open(dir)?);
            info!(path = %posts.path().display(), "using file-backed post store");
            let writer: Arc<dyn PostStore> = posts.clone();
            let reader: Arc<dyn PostReader> = posts;
            Ok(Stores { writer, reader, cursors: Arc::new(FileCursorStore::open(dir)?) })
        }
        None => {
            warn!("no data_dir configured, posts are kept in memory only");
            let posts = Arc::new(MemoryPostStore::new());
            let writer: Arc<dyn PostStore> = posts.clone();
            let reader: Arc<dyn PostReader> = posts;
            Ok(Stores { writer, reader, cursors: Arc::new(MemoryCursorStore::new()) })
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let stores = open_stores(&config)?;

    let extractor = HaikuExtractor::english().with_debug(config.ingest.debug_haiku);
    let retention = RetentionPolicy::from_hours(config.ingest.retention_hours)?;
    let subscription = Arc::new(Subscription::new(
        config.ingest.service.clone(),
        Ingestor::new(extractor, retention),
        stores.writer,
        stores.cursors,
        Arc::new(SystemClock),
    ));
    if let Some(cursor) = subscription.resume_cursor().await? {
        info!(service = subscription.service(), cursor, "resuming subscription");
    }

    if let Some(path) = args.replay.clone() {
        let (tx, rx) = mpsc::channel(64);
        tokio::spawn(async move {
            match source::replay_file(&path, tx).await {
                Ok(sent) => info!(sent, path = %path.display(), "replay finished"),
                Err(e) => error!(error = %e, "replay failed"),
            }
        });
        let sub = subscription.clone();
        tokio::spawn(async move {
            if let Err(e) = sub.run(rx).await {
                error!(error = %e, "subscription stopped");
            }
        });
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, stores.reader);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(%addr, "haiku feed listening");
    axum::serve(listener, app_with_state(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(&args.log_level, args.json_logs);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

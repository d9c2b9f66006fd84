//! tilemap-importer - command-line map importer
//!
//! Imports one tile pyramid directory and prints the resulting descriptor as
//! JSON on stdout. With `--save`, a freshly computed descriptor is written to
//! `<root>/map.json` so that the next import loads it instead.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Mutex;
use tilemap_common::config::{LoggingConfig, TomlConfig};
use tilemap_common::events::{EventBus, ImportEvent};
use tilemap_common::{ImportStatus, MapOrigin};
use tilemap_importer::{ImportOutcome, MapImporter};
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "tilemap-importer",
    version,
    about = "Import a tile pyramid directory as a map descriptor"
)]
struct Args {
    /// Directory holding the tile pyramid, or a folder a few levels above it
    directory: PathBuf,

    /// Configuration file (defaults to TILEMAP_CONFIG, then the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// How deep below DIRECTORY to look for the first tile
    #[arg(long)]
    max_depth: Option<usize>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long)]
    log_level: Option<String>,

    /// Write a newly computed descriptor to <root>/map.json
    #[arg(long)]
    save: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logging settings come from the config file, so the load outcome is
    // reported only once the subscriber exists
    let loaded = TomlConfig::resolve(args.config.as_deref());
    let mut config = loaded.config.clone();
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config.logging)?;

    info!("Starting tilemap-importer v{}", env!("CARGO_PKG_VERSION"));
    loaded.log_source();

    let mut settings = config.import;
    if let Some(depth) = args.max_depth {
        settings.max_search_depth = depth;
    }

    let event_bus = EventBus::new(settings.event_capacity);
    let observer = spawn_event_logger(event_bus.subscribe());
    let importer = MapImporter::new(event_bus).with_settings(settings);

    let (tx, rx) = oneshot::channel();
    let handle = importer
        .import(&args.directory, MapOrigin::Vips, Some(Box::new(tx)))
        .ok_or_else(|| anyhow!("No parser registered for {}", MapOrigin::Vips))?;

    let outcome = rx
        .await
        .context("Import finished without delivering a result")?;

    // Let delivery finish, then close the bus so the observer drains and exits
    handle.outcome().await;
    drop(importer);
    if let Err(e) = observer.await {
        warn!("Event observer ended abnormally: {}", e);
    }

    match outcome {
        ImportOutcome::Imported { descriptor, status } => {
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
            eprintln!("{}: {}", status, descriptor.directory.display());

            if args.save && status == ImportStatus::NewMap {
                let path = descriptor.descriptor_file();
                let json = serde_json::to_string_pretty(&descriptor)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Descriptor saved to {}", path.display());
            }
            Ok(())
        }
        ImportOutcome::Failed(error) => Err(anyhow::Error::new(error)
            .context(format!("Cannot import {}", args.directory.display()))),
    }
}

/// Install the global tracing subscriber
///
/// RUST_LOG overrides the configured level when set.
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

/// Log every terminal import event seen on the bus
fn spawn_event_logger(mut rx: broadcast::Receiver<ImportEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    debug!(import_id = %event.import_id(), "Observed {}", event.event_type());
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Event observer lagged, {} events skipped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

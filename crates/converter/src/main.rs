//! convert-worker — normalizes birth-message batches into model and asset
//! records and bulk-loads them into the destination tables.
//!
//! Flow: event batch → normalize → optional debug snapshot → conditional
//! writes (models first, then assets). Duplicate destination keys are
//! skipped; any other destination failure surfaces as a failed run.

mod event;

use std::io::Read;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use sparkwise_core::config::{load_dotenv, Config};
use sparkwise_gateway::{DynamoStore, RecordWriter, TableHandle};
use sparkwise_normalize::{normalize, SnapshotWriter};

use crate::event::ConvertEvent;

/// Birth-message converter for the asset-modeling store.
#[derive(Parser, Debug)]
#[command(name = "convert-worker", version, about)]
struct Cli {
    /// Path to the event JSON file (`-` reads stdin).
    #[arg(long, env = "SPARKWISE_EVENT", default_value = "-")]
    event: String,

    /// Normalize and snapshot only; skip destination writes.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    load_dotenv();
    let config = Config::from_env();
    config.log_summary();

    let event = read_event(&cli.event)?;
    info!(payloads = event.birth_data.len(), "processing birth batch");

    let outcome =
        normalize(&event.birth_data, &config.normalize).context("normalization failed")?;
    info!(
        models = outcome.models.len(),
        assets = outcome.assets.len(),
        "normalization complete"
    );

    if config.snapshot.enabled {
        SnapshotWriter::new(config.snapshot.dir.clone())
            .write(&outcome)
            .context("failed to write debug snapshot")?;
    }

    if cli.dry_run {
        info!("dry run, skipping destination writes");
        return Ok(());
    }

    let (Some(model_table), Some(asset_table)) = (
        config.tables.model_table.as_deref(),
        config.tables.asset_table.as_deref(),
    ) else {
        bail!("SPARKWISE_MODEL_TABLE and SPARKWISE_ASSET_TABLE must be set (or pass --dry-run)");
    };

    let store = DynamoStore::new(&config.gateway).await;
    let writer = RecordWriter::new(
        store,
        Duration::from_millis(config.gateway.write_pace_ms),
    );

    let models = writer
        .create_records(&TableHandle::models(model_table), &outcome.models)
        .await
        .context("failed to write model records")?;
    let assets = writer
        .create_records(&TableHandle::assets(asset_table), &outcome.assets)
        .await
        .context("failed to write asset records")?;

    info!(
        models_created = models.created,
        models_skipped = models.skipped,
        assets_created = assets.created,
        assets_skipped = assets.skipped,
        "birth batch processed"
    );

    Ok(())
}

fn read_event(source: &str) -> Result<ConvertEvent> {
    let text = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read event from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("failed to read event file {source}"))?
    };
    serde_json::from_str(&text).context("failed to parse event JSON")
}

//! PatchWarden submitter binary
//!
//! Loads the store snapshot, drives one round, and writes the snapshot back.

use std::sync::Arc;

use anyhow::{Context, Result};
use prometheus::{Encoder, TextEncoder};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use patchwarden_common::{PatchCatalog, VERSION};
use patchwarden_selection::{PatchEvaluator, RotationScheduler, SelectionMetrics};
use patchwarden_store::{InMemoryStore, StoreSnapshot};
use patchwarden_submitter::{RoundDriver, SubmitterConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting PatchWarden submitter v{}", VERSION);

    // Load configuration
    let config = SubmitterConfig::load()?;
    info!("Loaded configuration: {:?}", config);

    let catalog = match &config.catalog_path {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading catalog {}", path.display()))?;
            PatchCatalog::from_json(&json)?
        }
        None => PatchCatalog::default(),
    };
    info!(patch_types = catalog.len(), order = ?catalog.order(), "Patch catalog ready");
    let catalog = Arc::new(catalog);

    let store = if tokio::fs::try_exists(&config.state_path).await? {
        let json = tokio::fs::read_to_string(&config.state_path)
            .await
            .with_context(|| format!("reading state {}", config.state_path.display()))?;
        InMemoryStore::from_snapshot(StoreSnapshot::from_json(&json)?)?
    } else {
        info!(path = %config.state_path.display(), "No state file, starting empty");
        InMemoryStore::new()
    };
    let store = Arc::new(store);

    let registry = prometheus::Registry::new();
    let metrics = Arc::new(SelectionMetrics::new()?);
    metrics.register(&registry)?;

    let evaluator = PatchEvaluator::new(store.clone(), catalog.clone(), &config.selection)
        .with_metrics(metrics.clone());
    let scheduler = RotationScheduler::new(store.clone(), catalog).with_metrics(metrics);
    let driver = RoundDriver::new(store.clone(), evaluator, scheduler);

    let report = driver.run_round(config.round).await;

    let stats = store.stats();
    info!(
        challenge_sets = stats.challenge_sets,
        variants = stats.variants,
        fieldings = stats.fieldings,
        cables = stats.cables,
        pending = stats.pending_cables,
        "Store after round"
    );

    let json = store.snapshot().to_json()?;
    tokio::fs::write(&config.state_path, json)
        .await
        .with_context(|| format!("writing state {}", config.state_path.display()))?;

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    debug!("Metrics:\n{}", String::from_utf8_lossy(&buffer));

    if !report.failures.is_empty() {
        anyhow::bail!(
            "round {} finished with {} failed challenge sets",
            report.round,
            report.failures.len()
        );
    }

    info!("Round {} complete", report.round);
    Ok(())
}

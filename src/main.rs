//! Digest Worker - request/reply hashing over NATS
//!
//! Consumes digest requests from a queue-group subscription, memoizes results
//! for a fixed TTL, and replies to the caller's reply subject.

use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info, warn};

use digest_worker::{
    init_tracing, log_cache_stats, shutdown_signal, spawn_sweep_task, Config, DigestCache,
    NatsBus, Worker,
};

/// Main entry point for the digest worker.
///
/// # Startup Sequence
/// 1. Load configuration from environment variables
/// 2. Initialize tracing subscriber for logging
/// 3. Connect to NATS (fatal on failure)
/// 4. Create the digest cache with the configured TTL
/// 5. Start the optional sweep task
/// 6. Subscribe and start handling requests
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(config.log_level);
    debug!("Debug logging enabled");

    info!(
        "Configuration loaded: nats_url={}, subject={}, queue_group={}, cache_ttl={}s, sweep_interval={}s",
        config.nats_url,
        config.request_subject,
        config.queue_group,
        config.cache_ttl,
        config.sweep_interval
    );

    let bus = NatsBus::connect(&config.nats_url, config.credentials())
        .await
        .with_context(|| format!("failed to connect to NATS at {}", config.nats_url))?;

    let cache = Arc::new(DigestCache::new(config.cache_ttl()));
    info!("Digest cache initialized");

    let mut background = Vec::new();
    if let Some(interval) = config.sweep_interval() {
        background.push(spawn_sweep_task(cache.clone(), interval));
        info!("Background sweep task started");
    }

    let worker = Worker::from_config(Arc::new(bus.clone()), cache.clone(), &config);
    let worker_handle = worker
        .start()
        .await
        .context("failed to subscribe to request subject")?;
    background.push(worker_handle);

    shutdown_signal().await;
    for handle in background {
        handle.abort();
    }
    warn!("Background tasks aborted");
    log_cache_stats(&cache);

    if let Err(e) = bus.flush().await {
        warn!("Flush on shutdown failed: {}", e);
    }
    info!("Worker shutdown complete");
    Ok(())
}

//! Digest Ingress - HTTP to NATS forwarder
//!
//! Accepts JSON objects on `POST /v1/api` and publishes them on a subject.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use digest_worker::ingress::create_router;
use digest_worker::{init_tracing, shutdown_signal, IngressConfig, IngressState, NatsBus};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = IngressConfig::from_env();
    init_tracing(config.log_level);

    info!(
        "Configuration loaded: nats_url={}, subject={}, port={}",
        config.nats_url, config.subject, config.port
    );

    let bus = NatsBus::connect(&config.nats_url, config.credentials())
        .await
        .with_context(|| format!("failed to connect to NATS at {}", config.nats_url))?;

    let app = create_router(IngressState::new(Arc::new(bus), config.subject.as_str()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Ingress listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("ingress server error")?;

    info!("Ingress shutdown complete");
    Ok(())
}

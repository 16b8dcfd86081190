//! Digest Worker - request/reply hashing over NATS
//!
//! Consumes digest requests from a queue-group subscription, memoizes results
//! for a fixed TTL, and replies to the caller's reply subject.

pub mod bus;
pub mod cache;
pub mod config;
pub mod digest;
pub mod error;
pub mod ingress;
pub mod models;
pub mod shutdown;
pub mod tasks;
pub mod worker;

pub use bus::{MemoryBus, MessageBus, NatsBus};
pub use cache::DigestCache;
pub use config::{Config, IngressConfig};
pub use error::WorkerError;
pub use ingress::IngressState;
pub use shutdown::shutdown_signal;
pub use tasks::{log_cache_stats, spawn_sweep_task};
pub use worker::Worker;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` picks info or debug for the
/// library and both binaries.
pub fn init_tracing(level: config::LogLevel) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{},{},tower_http=info",
                    level.filter_directive("digest_worker"),
                    level.filter_directive("digest_ingress")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

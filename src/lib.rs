//! Podman Exporter: republishes per-container statistics of a Podman service
//! as Prometheus metrics.
//!
//! Statistics are fetched lazily: every scrape of the metrics endpoint asks the
//! engine for one fresh snapshot, bounded by a short deadline, and rebuilds the
//! per-container gauges from it.
use std::sync::Arc;

use engine::PodmanClient;

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod unix;

pub use config::Config;
pub use error::{Error, Result};

/// Runs the exporter until the process terminates.
///
/// Checks that the engine is reachable, builds the metric registry and serves
/// scrapes on the configured address.
///
/// # Errors
///
/// Possible errors include:
/// - An engine url that does not point to a unix socket.
/// - An engine that does not answer the startup health check.
/// - A listen address that cannot be bound.
pub async fn run(config: Config) -> Result<()> {
    let socket_path = config.socket_path()?;
    let client = PodmanClient::new(&socket_path);
    client
        .ping()
        .await
        .map_err(|source| Error::EngineInit {
            path: socket_path.clone(),
            source,
        })?;
    log::info!("Connected to podman service at {}", socket_path.display());

    let registry = metrics::Registry::new().map_err(Error::Registry)?;
    let collector = Arc::new(metrics::Collector::new(client, registry));
    for desc in collector.describe() {
        log::debug!("Exporting {}: {}", desc.fq_name, desc.help);
    }

    api::APIServer::new(collector)
        .listen(&config.listen_addr())
        .await
}

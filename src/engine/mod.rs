//! Access to per-container resource statistics of the container engine.
//!
//! The engine is asked for a single, non-streaming snapshot of every running
//! container. Each call is bounded by a deadline; a call that misses it is
//! cancelled and reported as [`Error::DeadlineExceeded`].
mod deadline;
mod error;
mod models;
mod podman;

pub use deadline::with_deadline;
pub use error::{Error, Result};
pub use models::ContainerStatSample;
pub use podman::PodmanClient;

/// A source of container statistics snapshots.
pub trait StatsSource {
    /// Fetches the statistics of all currently running containers.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<ContainerStatSample>>> + Send;
}

//! Prometheus view of the engine's container statistics.
//!
//! - [`Registry`] owns the exported gauges: `podman_num_ctrs` and nine
//!   per-container families labeled by `{id, name}`.
//! - [`Collector`] runs a scrape: reset the families, fetch a snapshot,
//!   repopulate and gather, all under one lock.
mod collector;
mod registry;

pub use collector::Collector;
pub use registry::Registry;
#[cfg(test)]
pub(crate) use registry::DESC_COUNT;

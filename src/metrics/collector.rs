use prometheus::core::Desc;
use prometheus::proto::MetricFamily;

use super::Registry;
use crate::engine::StatsSource;
use crate::error::ResultOkLogExt;

/// Turns engine snapshots into the exported metric set, one scrape at a time.
pub struct Collector<S> {
    source: S,
    descs: Vec<Desc>,
    registry: tokio::sync::Mutex<Registry>,
}

impl<S> Collector<S>
where
    S: StatsSource,
{
    pub fn new(source: S, registry: Registry) -> Self {
        Self {
            source,
            descs: registry.descs(),
            registry: tokio::sync::Mutex::new(registry),
        }
    }

    /// Returns the descriptors of all exported metrics without touching the engine.
    pub fn describe(&self) -> &[Desc] {
        &self.descs
    }

    /// Runs one scrape and returns the resulting metric set.
    ///
    /// The per-container families are cleared and refilled from a fresh
    /// snapshot while the registry lock is held, so concurrent callers never
    /// observe a partially reset registry. If the snapshot cannot be fetched,
    /// the families stay empty and the container count keeps its last value.
    pub async fn collect(&self) -> Vec<MetricFamily> {
        let registry = self.registry.lock().await;
        let before = std::time::Instant::now();

        registry.reset();
        if let Some(samples) = self
            .source
            .fetch_all()
            .await
            .ok_log("failed to fetch container stats")
        {
            log::trace!("Fetched stats of {} containers", samples.len());
            registry.populate(&samples);
        }
        let families = registry.gather();

        log::trace!("collect() took {} nanoseconds", before.elapsed().as_nanos());
        families
    }
}

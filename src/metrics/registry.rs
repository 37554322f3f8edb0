use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Gauge, GaugeVec, Opts};

use crate::engine::ContainerStatSample;

/// Prefix of every exported metric name.
const NAMESPACE: &str = "podman";

/// Labels identifying a container inside every per-container family.
const CONTAINER_LABELS: [&str; 2] = ["id", "name"];

/// Number of descriptors exported: the container count plus nine families.
#[cfg(test)]
pub(crate) const DESC_COUNT: usize = 10;

/// The exported gauges: one container count and nine per-container families.
///
/// Every gauge is also registered in a private [`prometheus::Registry`], which
/// rejects invalid or conflicting descriptors when the set is built.
pub struct Registry {
    registry: prometheus::Registry,
    num_ctrs: Gauge,
    pids: GaugeVec,
    cpuperc: GaugeVec,
    memusage: GaugeVec,
    memlimit: GaugeVec,
    memperc: GaugeVec,
    netin: GaugeVec,
    netout: GaugeVec,
    blkin: GaugeVec,
    blkout: GaugeVec,
}

fn container_gauge(name: &str, help: &str) -> prometheus::Result<GaugeVec> {
    GaugeVec::new(Opts::new(name, help).namespace(NAMESPACE), &CONTAINER_LABELS)
}

impl Registry {
    /// Builds and validates all gauges.
    ///
    /// # Errors
    ///
    /// Returns an error if a descriptor is invalid or two gauges collide.
    pub fn new() -> prometheus::Result<Self> {
        let num_ctrs = Gauge::with_opts(
            Opts::new("num_ctrs", "Number of running containers").namespace(NAMESPACE),
        )?;
        let metrics = Self {
            registry: prometheus::Registry::new(),
            num_ctrs,
            pids: container_gauge("pids", "Number of running pids in the container")?,
            cpuperc: container_gauge("cpuperc", "percentage cpu")?,
            memusage: container_gauge("memusage", "memory usage")?,
            memlimit: container_gauge("memlimit", "memory limit")?,
            memperc: container_gauge("memperc", "memory percentage")?,
            netin: container_gauge("netin", "network in")?,
            netout: container_gauge("netout", "network out")?,
            blkin: container_gauge("blkin", "blocks in")?,
            blkout: container_gauge("blkout", "blocks out")?,
        };

        metrics
            .registry
            .register(Box::new(metrics.num_ctrs.clone()))?;
        for family in metrics.families() {
            metrics.registry.register(Box::new(family.clone()))?;
        }

        Ok(metrics)
    }

    fn families(&self) -> [&GaugeVec; 9] {
        [
            &self.pids,
            &self.cpuperc,
            &self.memusage,
            &self.memlimit,
            &self.memperc,
            &self.netin,
            &self.netout,
            &self.blkin,
            &self.blkout,
        ]
    }

    /// Returns the static descriptors of all exported metrics.
    pub fn descs(&self) -> Vec<Desc> {
        std::iter::once(&self.num_ctrs as &dyn Collector)
            .chain(
                self.families()
                    .into_iter()
                    .map(|family| family as &dyn Collector),
            )
            .flat_map(|collector| collector.desc())
            .cloned()
            .collect()
    }

    /// Removes every labeled entry from the per-container families.
    ///
    /// The container count is left untouched.
    pub fn reset(&self) {
        for family in self.families() {
            family.reset();
        }
    }

    /// Sets the container count and every per-container gauge from `samples`.
    ///
    /// Samples sharing an `(id, name)` pair overwrite each other in order.
    pub fn populate(&self, samples: &[ContainerStatSample]) {
        self.num_ctrs.set(samples.len() as f64);

        for sample in samples {
            let labels = [sample.container_id.as_str(), sample.name.as_str()];
            self.pids.with_label_values(&labels).set(sample.pids as f64);
            self.cpuperc.with_label_values(&labels).set(sample.cpu);
            self.memusage
                .with_label_values(&labels)
                .set(sample.mem_usage as f64);
            self.memlimit
                .with_label_values(&labels)
                .set(sample.mem_limit as f64);
            self.memperc.with_label_values(&labels).set(sample.mem_perc);
            self.netin
                .with_label_values(&labels)
                .set(sample.net_input as f64);
            self.netout
                .with_label_values(&labels)
                .set(sample.net_output as f64);
            self.blkin
                .with_label_values(&labels)
                .set(sample.block_input as f64);
            self.blkout
                .with_label_values(&labels)
                .set(sample.block_output as f64);
        }
    }

    /// Materializes the current state of all gauges.
    ///
    /// Families without any labeled entry are omitted.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    pub fn num_ctrs(&self) -> f64 {
        self.num_ctrs.get()
    }
}

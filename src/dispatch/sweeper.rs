//! Periodic eviction of unmatched one-shot handlers.
//!
//! A request whose response never shows up leaves its one-shot handlers
//! behind; the sweeper drops them once they outlive the TTL.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;

use crate::config::SweeperConfig;
use crate::dispatch::registry::Registry;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;

pub struct Sweeper {
    registry: Arc<Registry>,
    interval: Duration,
    ttl: Duration,
}

impl Sweeper {
    pub fn new(registry: Arc<Registry>, config: &SweeperConfig) -> Self {
        Self {
            registry,
            interval: Duration::from_secs(config.interval_secs),
            ttl: Duration::from_secs(config.ttl_secs),
        }
    }

    /// One sweep pass. Returns the number of handlers removed.
    pub fn sweep_once(&self) -> usize {
        let removed = self.registry.sweep(self.ttl);
        let stats = self.registry.stats();

        if removed > 0 {
            tracing::debug!(
                removed,
                remaining = stats.temporary,
                "Swept expired one-shot handlers"
            );
        }
        metrics::record_swept(removed);
        metrics::record_registry_size(&stats);
        removed
    }

    pub async fn run(self, mut shutdown: ShutdownSignal) {
        tracing::info!(
            interval = ?self.interval,
            ttl = ?self.ttl,
            "Sweeper starting"
        );

        let mut ticker = time::interval(self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep_once();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Sweeper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

//! Processing runtime.
//!
//! # Data Flow
//! ```text
//! input stream ──▶ receiver.rs ──(bounded mpsc)──▶ processor.rs ──▶ output stream
//!                                                     │
//!                                             dispatch::Dispatcher
//!                                                     │
//!                          dispatch::Sweeper ──▶ dispatch::Registry
//! ```
//!
//! # Design Decisions
//! - Three tasks: reader, processor, sweeper; the registry is the only
//!   shared state
//! - Shutdown stops the reader; the processor drains what was accepted
//!   and then the sweeper is stopped

pub mod processor;
pub mod receiver;

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncWrite};
use tokio::sync::mpsc;

use crate::config::MiddlewareConfig;
use crate::dispatch::{Dispatcher, Registry, Sweeper};
use crate::handlers::{self, ReplayStats};
use crate::lifecycle::Shutdown;

pub use processor::{ProcessError, ProcessStats, Processor};

/// A configured middleware instance: registry plus built-in handlers.
pub struct Middleware {
    config: MiddlewareConfig,
    registry: Arc<Registry>,
    replay_stats: Option<Arc<ReplayStats>>,
}

impl Middleware {
    /// Build the registry and install the handlers the config asks for.
    pub fn new(config: MiddlewareConfig) -> Self {
        let registry = Arc::new(Registry::new());

        handlers::install_rules(&registry, &config.rules);
        let replay_stats = config
            .replay_check
            .enabled
            .then(|| handlers::replay_check::install(&registry));

        Self {
            config,
            registry,
            replay_stats,
        }
    }

    /// Registry for installing additional handlers before `run`.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn replay_stats(&self) -> Option<&Arc<ReplayStats>> {
        self.replay_stats.as_ref()
    }

    /// Process `input` into `output` until input ends or `shutdown` fires.
    pub async fn run<R, W>(&self, input: R, output: &mut W, shutdown: &Shutdown) -> std::io::Result<ProcessStats>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin,
    {
        let (tx, rx) = mpsc::channel(self.config.processing.channel_capacity);

        let receiver = tokio::spawn(receiver::run(input, tx, shutdown.subscribe()));
        let sweeper = Sweeper::new(self.registry.clone(), &self.config.sweeper);
        let sweeper = tokio::spawn(sweeper.run(shutdown.subscribe()));

        let processor = Processor::new(Dispatcher::new(self.registry.clone()));
        let result = processor.run(rx, output).await;

        shutdown.trigger();
        if let Err(e) = receiver.await {
            tracing::error!(error = %e, "Receiver task failed");
        }
        if let Err(e) = sweeper.await {
            tracing::error!(error = %e, "Sweeper task failed");
        }

        result
    }
}

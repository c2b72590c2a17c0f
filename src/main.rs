//! gor-middleware
//!
//! Sits between the capture tool's stdout and stdin: reads hex frames on
//! stdin, runs handlers, writes frames on stdout. Logs go to stderr.
//!
//! # Architecture Overview
//!
//! ```text
//!   capture tool                     gor-middleware
//!  ┌────────────┐  hex lines   ┌──────────┐   ┌───────────┐   ┌───────────┐
//!  │   stdout   │─────────────▶│ receiver │──▶│ processor │──▶│  stdout   │──▶ capture tool
//!  └────────────┘              └──────────┘   └─────┬─────┘   └───────────┘
//!                                                   │
//!                                            ┌──────▼──────┐   ┌─────────┐
//!                                            │  registry   │◀──│ sweeper │
//!                                            │ (handlers)  │   └─────────┘
//!                                            └─────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::io::BufReader;

use gor_middleware::config::{load_config, validate_config, ConfigError, MiddlewareConfig};
use gor_middleware::lifecycle::{spawn_signal_handler, Shutdown};
use gor_middleware::observability::{logging, metrics};
use gor_middleware::Middleware;

#[derive(Parser)]
#[command(name = "gor-middleware")]
#[command(about = "Hex-framed traffic middleware for capture and replay", long_about = None)]
struct Cli {
    /// TOML config file; built-in defaults when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Lifetime of one-shot handlers, in seconds
    #[arg(long)]
    ttl_secs: Option<u64>,

    /// Interval between expiry sweeps, in seconds
    #[arg(long)]
    sweep_interval_secs: Option<u64>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    /// Compare replayed response statuses with the originals
    #[arg(long)]
    replay_check: bool,
}

impl Cli {
    fn apply(&self, config: &mut MiddlewareConfig) {
        if let Some(ttl) = self.ttl_secs {
            config.sweeper.ttl_secs = ttl;
        }
        if let Some(interval) = self.sweep_interval_secs {
            config.sweeper.interval_secs = interval;
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
        if self.replay_check {
            config.replay_check.enabled = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => MiddlewareConfig::default(),
    };
    cli.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    if let Err(e) = logging::init_logging(&config.observability) {
        eprintln!("gor-middleware: failed to initialize logging: {e}");
    }

    tracing::info!(
        ttl_secs = config.sweeper.ttl_secs,
        sweep_interval_secs = config.sweeper.interval_secs,
        rules = config.rules.len(),
        replay_check = config.replay_check.enabled,
        "gor-middleware starting"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    let signals = spawn_signal_handler(shutdown.clone());

    let middleware = Middleware::new(config);
    let stats = middleware
        .run(BufReader::new(tokio::io::stdin()), &mut tokio::io::stdout(), &shutdown)
        .await?;
    signals.abort();

    if let Some(replay) = middleware.replay_stats() {
        tracing::info!(
            matched = replay.matched(),
            mismatched = replay.mismatched(),
            "Replay check summary"
        );
    }
    tracing::info!(
        emitted = stats.emitted,
        malformed = stats.malformed,
        unknown_kind = stats.unknown_kind,
        "Shutdown complete"
    );
    Ok(())
}

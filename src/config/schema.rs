//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! middleware. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

use crate::frame::Channel;

/// Root configuration for the middleware.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MiddlewareConfig {
    /// Expiry of unmatched one-shot handlers.
    pub sweeper: SweeperConfig,

    /// Input pipeline settings.
    pub processing: ProcessingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Original-vs-replay status comparison.
    pub replay_check: ReplayCheckConfig,

    /// Payload rewrite rules, installed in order.
    pub rules: Vec<RuleConfig>,
}

/// Sweeper configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SweeperConfig {
    /// Seconds between sweeps.
    pub interval_secs: u64,

    /// Age in seconds after which an unfired one-shot handler is dropped.
    pub ttl_secs: u64,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval_secs: 1,
            ttl_secs: 60,
        }
    }
}

/// Input pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Lines buffered between the reader and the processor (backpressure).
    pub channel_capacity: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Replay check configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ReplayCheckConfig {
    /// Compare original and replayed response statuses.
    pub enabled: bool,
}

/// A payload rewrite applied to every event on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Channel the rule listens on (`message` for all).
    pub channel: Channel,

    #[serde(flatten)]
    pub action: RuleAction,
}

/// What a rule does to the payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RuleAction {
    SetHeader { name: String, value: String },
    SetPath { path: String },
    SetPathParam { name: String, value: String },
    SetStatus { status: String },
}

//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, capacity > 0)
//! - Check rule arguments can be spliced into a payload safely
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MiddlewareConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{MiddlewareConfig, RuleAction};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub fn validate_config(config: &MiddlewareConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.sweeper.interval_secs == 0 {
        errors.push(ValidationError::new("sweeper.interval_secs", "must be greater than 0"));
    }
    if config.sweeper.ttl_secs == 0 {
        errors.push(ValidationError::new("sweeper.ttl_secs", "must be greater than 0"));
    }
    if config.processing.channel_capacity == 0 {
        errors.push(ValidationError::new(
            "processing.channel_capacity",
            "must be greater than 0",
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("not a socket address: {:?}", config.observability.metrics_address),
        ));
    }

    for (i, rule) in config.rules.iter().enumerate() {
        let field = |name: &str| format!("rules[{i}].{name}");
        match &rule.action {
            RuleAction::SetHeader { name, value } => {
                if name.is_empty() || name.bytes().any(|b| b == b':' || b.is_ascii_whitespace()) {
                    errors.push(ValidationError::new(field("name"), "invalid header name"));
                }
                if value.bytes().any(|b| b == b'\r' || b == b'\n') {
                    errors.push(ValidationError::new(field("value"), "must not contain line breaks"));
                }
            }
            RuleAction::SetPath { path } => {
                if path.is_empty() || path.bytes().any(|b| b.is_ascii_whitespace()) {
                    errors.push(ValidationError::new(field("path"), "must be non-empty without whitespace"));
                }
            }
            RuleAction::SetPathParam { name, value } => {
                if name.is_empty() || name.contains(|c: char| matches!(c, '&' | '=' | '?')) {
                    errors.push(ValidationError::new(field("name"), "invalid parameter name"));
                }
                if value.contains('&') {
                    errors.push(ValidationError::new(field("value"), "must not contain '&'"));
                }
            }
            RuleAction::SetStatus { status } => {
                if status.len() != 3 || !status.bytes().all(|b| b.is_ascii_digit()) {
                    errors.push(ValidationError::new(field("status"), "must be a three-digit code"));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RuleConfig;
    use crate::frame::Channel;

    fn with_rule(action: RuleAction) -> MiddlewareConfig {
        MiddlewareConfig {
            rules: vec![RuleConfig {
                channel: Channel::Request,
                action,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&MiddlewareConfig::default()).is_ok());
    }

    #[test]
    fn bad_metrics_address() {
        let mut config = MiddlewareConfig::default();
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "localhost".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "observability.metrics_address");
    }

    #[test]
    fn bad_rules() {
        let cases = [
            RuleAction::SetHeader { name: "Bad Name".into(), value: "v".into() },
            RuleAction::SetHeader { name: "X".into(), value: "a\r\nInjected: 1".into() },
            RuleAction::SetPath { path: "/a b".into() },
            RuleAction::SetPathParam { name: "".into(), value: "v".into() },
            RuleAction::SetStatus { status: "20".into() },
            RuleAction::SetStatus { status: "abc".into() },
        ];
        for action in cases {
            let errors = validate_config(&with_rule(action.clone())).unwrap_err();
            assert_eq!(errors.len(), 1, "{action:?}");
            assert!(errors[0].field.starts_with("rules[0]."));
        }
    }

    #[test]
    fn good_rules() {
        let cases = [
            RuleAction::SetHeader { name: "X-Replayed".into(), value: "".into() },
            RuleAction::SetPath { path: "/health".into() },
            RuleAction::SetPathParam { name: "debug".into(), value: "1".into() },
            RuleAction::SetStatus { status: "204".into() },
        ];
        for action in cases {
            assert!(validate_config(&with_rule(action)).is_ok());
        }
    }
}

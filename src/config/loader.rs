//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::MiddlewareConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<MiddlewareConfig, ConfigError> {
    let config: MiddlewareConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<MiddlewareConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/gor-middleware.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn bad_toml_is_parse_error() {
        assert!(matches!(parse_config("[sweeper"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn all_validation_errors_are_reported() {
        let err = parse_config(
            r#"
            [sweeper]
            interval_secs = 0
            ttl_secs = 0
            "#,
        )
        .unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!("gor-middleware-{}.toml", std::process::id()));
        fs::write(&path, "[replay_check]\nenabled = true\n").unwrap();
        let config = load_config(&path).unwrap();
        assert!(config.replay_check.enabled);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn shipped_example_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("gor-middleware.example.toml");
        let config = load_config(&path).unwrap();
        assert_eq!(config.rules.len(), 2);
        assert!(config.replay_check.enabled);
    }
}

//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    let config: ServerConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Attribute;
    use crate::level::Level;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            [listener]
            bind_address = "0.0.0.0:9000"

            [control]
            path_prefix = "/admin/log"

            [logging]
            level = "DEBUG"
            add_source = true
            json = true

            [[logging.attributes]]
            key = "service"
            value = "billing"

            [[logging.attributes]]
            key = "region"
            value = "eu-west-1"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:9000");
        assert_eq!(config.listener.request_timeout_secs, 10);
        assert_eq!(config.control.path_prefix, "/admin/log");
        assert_eq!(config.logging.level, Level::Debug);
        assert!(config.logging.add_source);
        assert!(config.logging.json);
        assert_eq!(
            config.logging.attributes,
            vec![
                Attribute::new("service", "billing"),
                Attribute::new("region", "eu-west-1"),
            ]
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.logging.level, Level::Info);
        assert_eq!(config.control.path_prefix, "/log");
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_unknown_level_is_parse_error() {
        let err = parse_config("[logging]\nlevel = \"verbose\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("verbose"));
    }

    #[test]
    fn test_validation_error_surfaces() {
        let err = parse_config("[control]\npath_prefix = \"log\"\n").unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"warn\"").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.logging.level, Level::Warn);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

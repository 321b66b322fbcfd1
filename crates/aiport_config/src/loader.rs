//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{LogConfig, StreamKind};
use std::collections::HashSet;
use std::path::Path;

/// Loads and validates a logging configuration file.
pub fn load_config(path: &Path) -> Result<LogConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a logging configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<LogConfig, ConfigError> {
    let config: LogConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks that file streams name a unique path and other streams name none.
fn validate_config(config: &LogConfig) -> Result<(), ConfigError> {
    let mut seen_paths = HashSet::new();
    for (i, stream) in config.streams.iter().enumerate() {
        match (stream.kind, stream.path.as_deref()) {
            (StreamKind::File, None) | (StreamKind::File, Some("")) => {
                return Err(ConfigError::MissingField(format!("streams[{i}].path")));
            }
            (StreamKind::File, Some(path)) => {
                if !seen_paths.insert(path) {
                    return Err(ConfigError::ValidationError(format!(
                        "log file '{path}' is used by more than one stream"
                    )));
                }
            }
            (kind, Some(_)) => {
                return Err(ConfigError::ValidationError(format!(
                    "streams[{i}]: 'path' is only valid for file streams, not {kind:?}"
                )));
            }
            (_, None) => {}
        }
    }
    Ok(())
}

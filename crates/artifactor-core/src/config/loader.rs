//! Deploy config file loading

use super::types::DeployConfig;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Location of the deploy config inside the container
pub const DEFAULT_CONFIG_PATH: &str = "/etc/artifactor/config.yaml";

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Load the deploy config from a YAML file
pub fn load_deploy_config(path: &Path) -> Result<DeployConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config = parse_deploy_config(&contents)?;
    debug!(
        path = %path.display(),
        providers = config.providers.len(),
        "loaded deploy config"
    );
    Ok(config)
}

/// Parse deploy config YAML text.
///
/// An empty document yields an empty config.
pub fn parse_deploy_config(contents: &str) -> Result<DeployConfig, ConfigError> {
    if contents.trim().is_empty() {
        return Ok(DeployConfig::default());
    }
    Ok(serde_yaml::from_str(contents)?)
}

//! Configuration loading
//!
//! Two sources feed a run:
//! 1. The deploy config YAML file (providers and their credentials)
//! 2. Environment variables describing the single project to deploy

mod loader;
mod types;

pub use loader::{ConfigError, DEFAULT_CONFIG_PATH, load_deploy_config, parse_deploy_config};
pub use types::{DeployConfig, ProjectConfig, ProviderConfig};

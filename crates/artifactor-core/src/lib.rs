//! Core library for artifactor: one-shot release artifact deployment
//!
//! Resolves the newest release of a project on GitHub or GitLab, downloads
//! its zip artifact and materializes it into a deployment volume.
//!
//! - [`provider`] holds the provider contract, the GitHub and GitLab
//!   resolvers and the [`ClientRegistry`].
//! - [`config`] loads the YAML deploy config and the environment project
//!   config.
//! - [`materialize`] extracts zip archives and copies auxiliary assets.
//! - [`deploy`] ties the pieces together for a single run.

pub mod config;
pub mod deploy;
pub mod error;
pub mod logging;
pub mod materialize;
pub mod provider;

pub use config::{ConfigError, DeployConfig, ProjectConfig, ProviderConfig};
pub use deploy::{DeployError, DeployOutcome, deploy};
pub use error::ProviderError;
pub use materialize::{MaterializeError, copy_assets, extract_zip};
pub use provider::{ArtifactProvider, ClientRegistry, FetchResult, ProjectRequest, ProviderKind};

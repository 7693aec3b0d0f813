//! Configuration types

use crate::provider::ProjectRequest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Deploy configuration loaded from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeployConfig {
    /// Providers keyed by name (for GitLab the name doubles as host name)
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,
}

impl DeployConfig {
    /// Look up a provider entry by name
    pub fn provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.get(name)
    }
}

/// Git hosting provider entry
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProviderConfig {
    /// Base API URL; empty means the provider's default
    #[serde(default)]
    pub url: String,
    /// `github` or `gitlab`
    #[serde(rename = "api-type", default)]
    pub kind: String,
    /// API access token
    #[serde(rename = "secret-token", default)]
    pub secret: String,
    /// Skip TLS certificate verification (self-signed internal servers)
    #[serde(default = "default_insecure_skip_verify")]
    pub insecure_skip_verify: bool,
    /// Whole-request timeout; unset means no timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_insecure_skip_verify() -> bool {
    true
}

impl ProviderConfig {
    /// Create an entry with default transport settings
    pub fn new(kind: impl Into<String>, url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: kind.into(),
            secret: secret.into(),
            insecure_skip_verify: default_insecure_skip_verify(),
            timeout_secs: None,
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("url", &self.url)
            .field("kind", &self.kind)
            .field("secret", &if self.secret.is_empty() { "" } else { "<redacted>" })
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Project to deploy, read from the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Provider name (key in [`DeployConfig::providers`])
    pub provider: String,
    /// GitHub organization or GitLab group
    pub group: String,
    /// Repository or project
    pub project: String,
    /// Path inside the zip to extract
    pub source_path: String,
    /// Volume where release artifacts are extracted
    pub mount_volume: String,
    /// `master` (prod) or `devel`; currently not used to filter releases
    pub mode: String,
    /// Source directory of additional assets
    pub assets_source: String,
    /// Folder in the mount volume receiving the additional assets
    pub assets_destination: String,
}

impl ProjectConfig {
    pub const PROVIDER_ENV: &'static str = "PROVIDER";
    pub const GROUP_ENV: &'static str = "GROUP";
    pub const PROJECT_ENV: &'static str = "PROJECT";
    pub const SOURCE_PATH_ENV: &'static str = "SOURCE_PATH";
    pub const VOLUME_ENV: &'static str = "VOLUME";
    pub const MODE_ENV: &'static str = "APP_SERVER_MODE";
    pub const ASSETS_SRC_ENV: &'static str = "ASSETS_SRC";
    pub const ASSETS_DST_ENV: &'static str = "ASSETS_DST";

    /// Read the project description from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the project description through an arbitrary lookup.
    ///
    /// Missing variables become empty strings.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();
        Self {
            provider: get(Self::PROVIDER_ENV),
            group: get(Self::GROUP_ENV),
            project: get(Self::PROJECT_ENV),
            source_path: get(Self::SOURCE_PATH_ENV),
            mount_volume: get(Self::VOLUME_ENV),
            mode: get(Self::MODE_ENV),
            assets_source: get(Self::ASSETS_SRC_ENV),
            assets_destination: get(Self::ASSETS_DST_ENV),
        }
    }

    /// The artifact-fetch part of this project description
    pub fn request(&self) -> ProjectRequest {
        ProjectRequest {
            provider: self.provider.clone(),
            group: self.group.clone(),
            project: self.project.clone(),
            mode: self.mode.clone(),
        }
    }
}

//! Client registry mapping configured provider names to connected clients

use super::github::GitHubProvider;
use super::gitlab::GitLabProvider;
use super::traits::{ArtifactProvider, FetchResult};
use super::ProjectRequest;
use crate::config::{DeployConfig, ProviderConfig};
use crate::error::ProviderError;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Provider API flavour declared by `api-type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    GitHub,
    GitLab,
}

impl ProviderKind {
    /// Parse an `api-type` value (case-insensitive)
    pub fn parse(kind: &str) -> Option<Self> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "github" => Some(Self::GitHub),
            "gitlab" => Some(Self::GitLab),
            _ => None,
        }
    }

    /// Connect a client of this kind for one provider entry
    pub fn connect(
        self,
        name: &str,
        config: &ProviderConfig,
    ) -> Result<Box<dyn ArtifactProvider>, ProviderError> {
        Ok(match self {
            Self::GitHub => Box::new(GitHubProvider::connect(name, config)?),
            Self::GitLab => Box::new(GitLabProvider::connect(name, config)?),
        })
    }
}

/// Connected provider clients keyed by provider name.
///
/// Built once from the deploy config and read-only afterwards.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: HashMap<String, Box<dyn ArtifactProvider>>,
}

impl ClientRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
        }
    }

    /// Connect every configured provider.
    ///
    /// Entries with an unknown `api-type` or a client that cannot be built
    /// are logged and skipped; they do not fail the whole registry.
    pub fn connect(config: &DeployConfig) -> Self {
        let mut registry = Self::new();

        for (name, provider) in &config.providers {
            match Self::connect_provider(name, provider) {
                Ok(client) => {
                    info!(provider = %name, kind = client.provider_name(), "provider");
                    registry.insert(name.clone(), client);
                }
                Err(e) => warn!(provider = %name, error = %e, "skipping provider"),
            }
        }

        registry
    }

    /// Connect a single provider entry
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::UnknownProviderType` for an unrecognised
    /// `api-type`, or `ProviderError::Connect` if the client cannot be built.
    pub fn connect_provider(
        name: &str,
        config: &ProviderConfig,
    ) -> Result<Box<dyn ArtifactProvider>, ProviderError> {
        let kind = ProviderKind::parse(&config.kind).ok_or_else(|| {
            ProviderError::UnknownProviderType {
                provider: name.to_string(),
                kind: config.kind.clone(),
            }
        })?;
        kind.connect(name, config)
    }

    /// Register a client under a provider name
    ///
    /// If a client with the same name already exists, it will be replaced.
    pub fn insert(&mut self, name: impl Into<String>, client: Box<dyn ArtifactProvider>) {
        self.clients.insert(name.into(), client);
    }

    /// Look up the client for a provider name
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::ProviderNotConfigured` if no client is registered.
    pub fn get(&self, name: &str) -> Result<&dyn ArtifactProvider, ProviderError> {
        self.clients
            .get(name)
            .map(|client| client.as_ref())
            .ok_or_else(|| ProviderError::ProviderNotConfigured {
                provider: name.to_string(),
            })
    }

    /// Resolve and download the artifact for one project request
    pub fn fetch(&self, request: &ProjectRequest) -> FetchResult {
        let client = self.get(&request.provider)?;
        debug!(
            provider = %request.provider,
            kind = client.provider_name(),
            group = %request.group,
            project = %request.project,
            "fetching release artifact"
        );
        client.load_assets(&request.group, &request.project, &request.mode)
    }

    /// Registered provider names, sorted
    pub fn provider_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.clients.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Check if a provider is registered
    pub fn contains(&self, name: &str) -> bool {
        self.clients.contains_key(name)
    }

    /// Get the number of registered clients
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock_provider::{MockCall, MockProvider};

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!(ProviderKind::parse("github"), Some(ProviderKind::GitHub));
        assert_eq!(ProviderKind::parse("GitLab"), Some(ProviderKind::GitLab));
        assert_eq!(ProviderKind::parse(" gitlab "), Some(ProviderKind::GitLab));
        assert_eq!(ProviderKind::parse("bitbucket"), None);
        assert_eq!(ProviderKind::parse(""), None);
    }

    #[test]
    fn test_registry_new() {
        let registry = ClientRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_registry_insert_and_get() {
        let mut registry = ClientRegistry::new();
        registry.insert("mock", Box::new(MockProvider::new()));

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("mock"));
        assert_eq!(registry.get("mock").unwrap().provider_name(), "MockProvider");
    }

    #[test]
    fn test_registry_get_not_configured() {
        let registry = ClientRegistry::new();
        let err = registry.get("missing").unwrap_err();
        assert!(matches!(err, ProviderError::ProviderNotConfigured { .. }));
        assert!(err.to_string().contains("not configured"));
    }

    #[test]
    fn test_registry_replace_client() {
        let mut registry = ClientRegistry::new();
        registry.insert("mock", Box::new(MockProvider::new()));
        registry.insert("mock", Box::new(MockProvider::with_artifact(b"zip".to_vec())));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_fetch_routes_request() {
        let mock = MockProvider::with_artifact(b"PK".to_vec());
        let mut registry = ClientRegistry::new();
        registry.insert("mock", Box::new(mock.clone()));

        let request = ProjectRequest {
            provider: "mock".to_string(),
            group: "acme".to_string(),
            project: "app".to_string(),
            mode: "master".to_string(),
        };
        let result = registry.fetch(&request).unwrap();
        assert_eq!(result, Some(b"PK".to_vec()));
        assert_eq!(
            mock.get_calls(),
            vec![MockCall::LoadAssets {
                group: "acme".to_string(),
                project: "app".to_string(),
                mode: "master".to_string(),
            }]
        );
    }

    #[test]
    fn test_registry_list_providers() {
        let mut registry = ClientRegistry::new();
        registry.insert("provider-c", Box::new(MockProvider::new()));
        registry.insert("provider-a", Box::new(MockProvider::new()));
        registry.insert("provider-b", Box::new(MockProvider::new()));

        assert_eq!(
            registry.provider_names(),
            vec!["provider-a", "provider-b", "provider-c"]
        );
    }

    #[test]
    fn test_connect_provider_unknown_kind() {
        let config = ProviderConfig::new("bitbucket", "https://bitbucket.org", "");
        let err = ClientRegistry::connect_provider("bb", &config).unwrap_err();
        match err {
            ProviderError::UnknownProviderType { provider, kind } => {
                assert_eq!(provider, "bb");
                assert_eq!(kind, "bitbucket");
            }
            other => panic!("expected UnknownProviderType, got {other:?}"),
        }
    }
}

//! Provider trait for artifact resolution across git hosting platforms

use crate::error::ProviderError;

/// Outcome of one artifact fetch.
///
/// `Ok(Some(bytes))` is the downloaded zip, `Ok(None)` means the project
/// exists but its newest release carries nothing to deploy.
pub type FetchResult = Result<Option<Vec<u8>>, ProviderError>;

/// Provider-agnostic release artifact resolution.
///
/// Each git host (GitHub, GitLab) implements this trait. Calls are blocking
/// and run one network request after another.
pub trait ArtifactProvider: Send + Sync + std::fmt::Debug {
    /// Provider name for logging/display
    fn provider_name(&self) -> &str;

    /// Resolve the newest release of `group/project` and download its
    /// deployable artifact.
    ///
    /// `mode` names the release flavour (`master`, `devel`). It is logged but
    /// does not filter releases.
    fn load_assets(&self, group: &str, project: &str, mode: &str) -> FetchResult;
}

//! Release artifact providers: GitHub and GitLab behind one contract

mod github;
mod gitlab;
mod http;
mod job_url;
#[cfg(any(test, feature = "test-support"))]
mod mock_provider;
mod registry;
mod traits;
mod types;

pub use github::{DEFAULT_GITHUB_API_URL, GitHubProvider};
pub use gitlab::GitLabProvider;
pub use job_url::extract_job_id;
#[cfg(any(test, feature = "test-support"))]
pub use mock_provider::{MockCall, MockProvider};
pub use registry::{ClientRegistry, ProviderKind};
pub use traits::{ArtifactProvider, FetchResult};
pub use types::{
    Asset, DEPLOYMENTS_LINK_PREFIX, DownloadRef, RELEASE_PAGE_SIZE, Release, ZIP_CONTENT_TYPE,
};

/// One artifact-fetch intent: which provider, group and project to resolve
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectRequest {
    /// Provider name as configured in the deploy config
    pub provider: String,
    /// GitHub organization or GitLab group
    pub group: String,
    /// Repository or project path
    pub project: String,
    /// Release flavour; not used for filtering
    pub mode: String,
}

//! Error types for artifact resolution

use thiserror::Error;

/// Boxed transport or parse error kept as the `source` of a [`ProviderError`]
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by provider resolvers and the client registry.
///
/// All variants are local to one resolution; none of them is fatal to the
/// process. A resolver that finds nothing to deploy returns `Ok(None)`
/// instead of an error.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// GitHub organization lookup failed or returned no login
    #[error("find organization `{org}` error: {message}")]
    OrgNotFound {
        org: String,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// GitHub repository lookup failed
    #[error("find project `{repo}` error: {message}")]
    RepoNotFound {
        repo: String,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// GitLab group search or group project listing failed
    #[error("find group or project `{name}` error: {message}")]
    GroupOrProjectNotFound {
        name: String,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Listing releases failed
    #[error("list releases of project `{project}` error: {message}")]
    ReleaseListFailed {
        project: String,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// GitLab link URL does not have the `.../jobs/<id>/artifacts/...` shape
    #[error("invalid artifact url `{url}` of project `{project}`")]
    InvalidArtifactUrl { project: String, url: String },

    /// Job id segment of a GitLab link URL is not an integer
    #[error("invalid job id `{raw}` of project `{project}`: {source}")]
    InvalidJobId {
        project: String,
        raw: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Artifact download request failed
    #[error("download assets of project `{project}` error: {message}")]
    DownloadFailed {
        project: String,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Artifact body could not be read
    #[error("read assets of project `{project}` error: {message}")]
    ReadFailed {
        project: String,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Configured `api-type` is neither github nor gitlab
    #[error("unknown provider type `{kind}` for provider `{provider}`")]
    UnknownProviderType { provider: String, kind: String },

    /// No client is registered under the requested provider name
    #[error("provider `{provider}` is not configured")]
    ProviderNotConfigured { provider: String },

    /// HTTP client for a provider could not be built
    #[error("connect provider `{provider}` error: {message}")]
    Connect {
        provider: String,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl ProviderError {
    /// True when the error means "nothing there" rather than a broken call
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::OrgNotFound { .. }
                | Self::RepoNotFound { .. }
                | Self::GroupOrProjectNotFound { .. }
                | Self::ProviderNotConfigured { .. }
        )
    }
}

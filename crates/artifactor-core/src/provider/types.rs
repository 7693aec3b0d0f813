//! Provider-agnostic release types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Media type a GitHub release asset must carry to be deployed
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// Name prefix a GitLab release link must carry to be deployed
pub const DEPLOYMENTS_LINK_PREFIX: &str = "Deployments";

/// Releases requested per listing; only the newest page is read
pub const RELEASE_PAGE_SIZE: u32 = 3;

/// A release as reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub tag: String,
    pub published_at: Option<DateTime<Utc>>,
    /// Assets in provider-returned order
    pub assets: Vec<Asset>,
}

/// A downloadable item attached to a release
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    /// Empty when the provider does not report one (GitLab links)
    pub content_type: String,
    pub download_ref: DownloadRef,
}

/// Provider-specific reference used to fetch an asset's bytes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DownloadRef {
    /// GitHub release asset id
    AssetId(u64),
    /// GitLab release link; the URL encodes the CI job id
    Link { url: String, external: bool },
}

impl Asset {
    /// GitHub rule: content type is exactly the zip media type
    pub fn is_zip(&self) -> bool {
        self.content_type == ZIP_CONTENT_TYPE
    }

    /// GitLab rule: internal link whose name starts with `Deployments`
    pub fn is_deployment_link(&self) -> bool {
        match &self.download_ref {
            DownloadRef::Link { external, .. } => {
                !external && self.name.starts_with(DEPLOYMENTS_LINK_PREFIX)
            }
            DownloadRef::AssetId(_) => false,
        }
    }
}

//! GitHub release artifact provider using the REST API

use super::http::{ApiClient, Redirects, TokenHeader, boxed};
use super::traits::{ArtifactProvider, FetchResult};
use super::types::{Asset, DownloadRef, RELEASE_PAGE_SIZE, Release};
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use chrono::{DateTime, Utc};
use reqwest::header::LOCATION;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Public GitHub API root, used when the provider entry has no `url`
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// GitHub provider resolving organization / repository / release assets
#[derive(Debug)]
pub struct GitHubProvider {
    name: String,
    api: ApiClient,
}

/// Result of asking GitHub for an asset's content
#[derive(Debug)]
enum AssetDownload {
    Bytes(Vec<u8>),
    /// The server pointed elsewhere; the location is not followed
    Redirect(String),
}

impl GitHubProvider {
    /// Build a GitHub client for a configured provider entry
    pub fn connect(name: &str, config: &ProviderConfig) -> Result<Self, ProviderError> {
        let base_url = if config.url.trim().is_empty() {
            DEFAULT_GITHUB_API_URL
        } else {
            config.url.as_str()
        };
        let api = ApiClient::build(name, base_url, config, TokenHeader::Bearer, Redirects::Manual)?;
        debug!(provider = name, base_url = %api.base_url(), "connected GitHub client");
        Ok(Self {
            name: name.to_string(),
            api,
        })
    }

    /// Registry name of this provider
    pub fn name(&self) -> &str {
        &self.name
    }

    fn find_org_login(&self, org: &str) -> Result<String, ProviderError> {
        let organization: GhOrganization =
            self.api
                .get_json(&["orgs", org], &[])
                .map_err(|e| ProviderError::OrgNotFound {
                    org: org.to_string(),
                    message: e.to_string(),
                    source: boxed(e),
                })?;

        match organization.login {
            Some(login) if !login.is_empty() => Ok(login),
            _ => Err(ProviderError::OrgNotFound {
                org: org.to_string(),
                message: "organization does not have login".to_string(),
                source: None,
            }),
        }
    }

    fn find_repo_name(&self, login: &str, project: &str) -> Result<String, ProviderError> {
        let repository: GhRepository = self
            .api
            .get_json(&["repos", login, project], &[])
            .map_err(|e| ProviderError::RepoNotFound {
                repo: project.to_string(),
                message: e.to_string(),
                source: boxed(e),
            })?;
        Ok(repository.name)
    }

    fn list_releases(&self, login: &str, repo: &str, project: &str) -> Result<Vec<Release>, ProviderError> {
        let per_page = RELEASE_PAGE_SIZE.to_string();
        let releases: Vec<GhRelease> = self
            .api
            .get_json(&["repos", login, repo, "releases"], &[("per_page", per_page.as_str())])
            .map_err(|e| ProviderError::ReleaseListFailed {
                project: project.to_string(),
                message: e.to_string(),
                source: boxed(e),
            })?;
        Ok(releases.into_iter().map(GhRelease::into_release).collect())
    }

    fn download_asset(
        &self,
        login: &str,
        repo: &str,
        project: &str,
        asset_id: u64,
    ) -> Result<AssetDownload, ProviderError> {
        let id = asset_id.to_string();
        let download_err = |e: reqwest::Error| ProviderError::DownloadFailed {
            project: project.to_string(),
            message: e.to_string(),
            source: boxed(e),
        };

        let response = self
            .api
            .get_raw(
                &["repos", login, repo, "releases", "assets", id.as_str()],
                "application/octet-stream",
            )
            .map_err(download_err)?;

        if response.status().is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            return Ok(AssetDownload::Redirect(location));
        }

        let body = response
            .error_for_status()
            .map_err(download_err)?
            .bytes()
            .map_err(|e| ProviderError::ReadFailed {
                project: project.to_string(),
                message: e.to_string(),
                source: boxed(e),
            })?;
        Ok(AssetDownload::Bytes(body.to_vec()))
    }
}

impl ArtifactProvider for GitHubProvider {
    fn provider_name(&self) -> &str {
        "GitHub"
    }

    fn load_assets(&self, group: &str, project: &str, mode: &str) -> FetchResult {
        debug!(provider = %self.name, group, project, mode, "resolving GitHub release");

        let login = self.find_org_login(group)?;
        let repo = self.find_repo_name(&login, project)?;
        let releases = self.list_releases(&login, &repo, project)?;

        // Only the newest release decides what gets deployed.
        let Some(release) = releases.first() else {
            debug!(project, "no releases");
            return Ok(None);
        };
        info!(
            tag = %release.tag,
            published_at = ?release.published_at,
            provider = "GitHub",
            "release"
        );

        for asset in &release.assets {
            info!(asset = %asset.name, content_type = %asset.content_type, "asset");
            if !asset.is_zip() {
                continue;
            }
            let DownloadRef::AssetId(asset_id) = asset.download_ref else {
                continue;
            };
            match self.download_asset(&login, &repo, project, asset_id)? {
                AssetDownload::Bytes(body) => {
                    debug!(asset = %asset.name, size = body.len(), "downloaded asset");
                    return Ok(Some(body));
                }
                AssetDownload::Redirect(location) => {
                    warn!(asset = %asset.name, %location, "asset download redirected; not followed");
                }
            }
        }

        Ok(None)
    }
}

#[derive(Debug, Deserialize)]
struct GhOrganization {
    login: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GhRepository {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GhRelease {
    tag_name: String,
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    assets: Vec<GhAsset>,
}

#[derive(Debug, Deserialize)]
struct GhAsset {
    id: u64,
    name: String,
    #[serde(default)]
    content_type: String,
}

impl GhRelease {
    fn into_release(self) -> Release {
        Release {
            tag: self.tag_name,
            published_at: self.published_at,
            assets: self
                .assets
                .into_iter()
                .map(|a| Asset {
                    name: a.name,
                    content_type: a.content_type,
                    download_ref: DownloadRef::AssetId(a.id),
                })
                .collect(),
        }
    }
}

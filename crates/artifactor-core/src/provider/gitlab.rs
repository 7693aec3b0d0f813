//! GitLab release artifact provider using the REST API (v4)
//!
//! Groups are found by substring search, projects by exact path inside each
//! group, and the deployable artifact is the CI job archive referenced by the
//! newest release's `Deployments*` link.

use super::http::{ApiClient, Redirects, TokenHeader, boxed};
use super::job_url::extract_job_id;
use super::traits::{ArtifactProvider, FetchResult};
use super::types::{Asset, DownloadRef, RELEASE_PAGE_SIZE, Release};
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

/// GitLab provider resolving group / project / release links / job artifacts
#[derive(Debug)]
pub struct GitLabProvider {
    name: String,
    api: ApiClient,
}

impl GitLabProvider {
    /// Build a GitLab client for a configured provider entry.
    ///
    /// Without an explicit `url` the provider name is taken as the GitLab
    /// host: `https://<name>/api/v4`.
    pub fn connect(name: &str, config: &ProviderConfig) -> Result<Self, ProviderError> {
        let base_url = if config.url.trim().is_empty() {
            format!("https://{name}/api/v4")
        } else {
            config.url.clone()
        };
        let api = ApiClient::build(
            name,
            &base_url,
            config,
            TokenHeader::PrivateToken,
            Redirects::Follow,
        )?;
        debug!(provider = name, base_url = %api.base_url(), "connected GitLab client");
        Ok(Self {
            name: name.to_string(),
            api,
        })
    }

    /// Registry name of this provider
    pub fn name(&self) -> &str {
        &self.name
    }

    fn search_groups(&self, group: &str) -> Result<Vec<GlGroup>, ProviderError> {
        self.api
            .get_json(&["groups"], &[("search", group)])
            .map_err(|e| ProviderError::GroupOrProjectNotFound {
                name: group.to_string(),
                message: e.to_string(),
                source: boxed(e),
            })
    }

    fn owned_group_projects(&self, group_id: u64, project: &str) -> Result<Vec<GlProject>, ProviderError> {
        let id = group_id.to_string();
        self.api
            .get_json(
                &["groups", id.as_str(), "projects"],
                &[("owned", "true"), ("search", project)],
            )
            .map_err(|e| ProviderError::GroupOrProjectNotFound {
                name: project.to_string(),
                message: e.to_string(),
                source: boxed(e),
            })
    }

    fn list_releases(&self, project_id: u64, project: &str) -> Result<Vec<Release>, ProviderError> {
        let id = project_id.to_string();
        let per_page = RELEASE_PAGE_SIZE.to_string();
        let releases: Vec<GlRelease> = self
            .api
            .get_json(
                &["projects", id.as_str(), "releases"],
                &[("per_page", per_page.as_str())],
            )
            .map_err(|e| ProviderError::ReleaseListFailed {
                project: project.to_string(),
                message: e.to_string(),
                source: boxed(e),
            })?;
        Ok(releases.into_iter().map(GlRelease::into_release).collect())
    }

    fn download_job_artifacts(&self, project_id: u64, job_id: u64, project: &str) -> Result<Vec<u8>, ProviderError> {
        let project_id = project_id.to_string();
        let job_id = job_id.to_string();
        let download_err = |e: reqwest::Error| ProviderError::DownloadFailed {
            project: project.to_string(),
            message: e.to_string(),
            source: boxed(e),
        };

        let body = self
            .api
            .get_raw(
                &["projects", project_id.as_str(), "jobs", job_id.as_str(), "artifacts"],
                "application/octet-stream",
            )
            .and_then(|response| response.error_for_status())
            .map_err(download_err)?
            .bytes()
            .map_err(|e| ProviderError::ReadFailed {
                project: project.to_string(),
                message: e.to_string(),
                source: boxed(e),
            })?;
        Ok(body.to_vec())
    }

    /// Scan the newest release of one project.
    ///
    /// `Ok(None)` here is final for the whole lookup.
    fn load_from_release(&self, project: &GlProject, release: &Release) -> FetchResult {
        info!(
            tag = %release.tag,
            created_at = ?release.published_at,
            provider = "GitLab",
            "release"
        );

        for link in &release.assets {
            if let DownloadRef::Link { url, external } = &link.download_ref {
                info!(link = %link.name, %url, external = *external, "link");
            }
            if !link.is_deployment_link() {
                continue;
            }
            let DownloadRef::Link { url, .. } = &link.download_ref else {
                continue;
            };

            info!(link = %link.name, "download assets");
            let job_id = extract_job_id(&project.path, url)?;
            let body = self.download_job_artifacts(project.id, job_id, &project.path)?;
            debug!(job_id, size = body.len(), "downloaded job artifacts");
            return Ok(Some(body));
        }

        Ok(None)
    }
}

impl ArtifactProvider for GitLabProvider {
    fn provider_name(&self) -> &str {
        "GitLab"
    }

    fn load_assets(&self, group: &str, project: &str, mode: &str) -> FetchResult {
        debug!(provider = %self.name, group, project, mode, "resolving GitLab release");

        for found_group in self.search_groups(group)? {
            debug!(group_id = found_group.id, full_path = %found_group.full_path, "group");

            let projects = self.owned_group_projects(found_group.id, project)?;
            for candidate in projects.iter().filter(|p| p.path == project) {
                info!(project = %candidate.path_with_namespace, "project");

                let releases = self.list_releases(candidate.id, project)?;
                // The newest release is authoritative: no fallthrough to older
                // releases, other projects or other groups.
                if let Some(release) = releases.first() {
                    return self.load_from_release(candidate, release);
                }
            }
        }

        Ok(None)
    }
}

#[derive(Debug, Deserialize)]
struct GlGroup {
    id: u64,
    #[serde(default)]
    full_path: String,
}

#[derive(Debug, Deserialize)]
struct GlProject {
    id: u64,
    path: String,
    #[serde(default)]
    path_with_namespace: String,
}

#[derive(Debug, Deserialize)]
struct GlRelease {
    tag_name: String,
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    assets: GlReleaseAssets,
}

#[derive(Debug, Default, Deserialize)]
struct GlReleaseAssets {
    #[serde(default)]
    links: Vec<GlLink>,
}

#[derive(Debug, Deserialize)]
struct GlLink {
    name: String,
    url: String,
    #[serde(default)]
    external: bool,
}

impl GlRelease {
    fn into_release(self) -> Release {
        Release {
            tag: self.tag_name,
            published_at: self.created_at,
            assets: self
                .assets
                .links
                .into_iter()
                .map(|l| Asset {
                    name: l.name,
                    content_type: String::new(),
                    download_ref: DownloadRef::Link {
                        url: l.url,
                        external: l.external,
                    },
                })
                .collect(),
        }
    }
}

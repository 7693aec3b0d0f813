//! CI job id extraction from GitLab release link URLs
//!
//! Release links produced by CI point at job artifacts, e.g.
//! `https://gitlab.example.com/web/portal/-/jobs/123/artifacts/download`.
//! The job id is the path between the `jobs` segment and the following
//! `artifacts` segment.

use crate::error::ProviderError;
use url::Url;

/// Extract the CI job id from a release link URL.
///
/// # Errors
///
/// - `InvalidArtifactUrl` if the URL does not parse, has no host, lacks a
///   `jobs` segment after the project path, or lacks an `artifacts` segment
///   after it that is itself followed by a path
/// - `InvalidJobId` if the path between the two markers is not an integer
pub fn extract_job_id(project: &str, link_url: &str) -> Result<u64, ProviderError> {
    let invalid_url = || ProviderError::InvalidArtifactUrl {
        project: project.to_string(),
        url: link_url.to_string(),
    };

    let url = Url::parse(link_url).map_err(|_| invalid_url())?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid_url());
    }
    let segments: Vec<&str> = url.path_segments().ok_or_else(invalid_url)?.collect();

    let (jobs_at, artifacts_at) = job_markers(&segments).ok_or_else(invalid_url)?;
    let raw = segments[jobs_at + 1..artifacts_at].join("/");
    raw.parse::<u64>()
        .map_err(|source| ProviderError::InvalidJobId {
            project: project.to_string(),
            raw,
            source,
        })
}

/// Positions of the `jobs` and `artifacts` markers in the link path.
///
/// `jobs` must follow at least one project path segment and `artifacts` must
/// be followed by more path. The last `jobs`/id/`artifacts` triple wins so a
/// group or project literally named `jobs` does not shadow the job route.
/// Without such a triple the first `jobs` and the next `artifacts` after it
/// are returned, leaving the span between them to fail id parsing.
fn job_markers(segments: &[&str]) -> Option<(usize, usize)> {
    let has_tail = |artifacts_at: usize| artifacts_at + 1 < segments.len();

    let exact = (1..segments.len().saturating_sub(2))
        .rev()
        .find(|&at| {
            segments[at] == "jobs" && segments[at + 2] == "artifacts" && has_tail(at + 2)
        });
    if let Some(jobs_at) = exact {
        return Some((jobs_at, jobs_at + 2));
    }

    let jobs_at = segments
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, s)| **s == "jobs")
        .map(|(at, _)| at)?;
    let artifacts_at = segments[jobs_at + 1..]
        .iter()
        .position(|s| *s == "artifacts")
        .map(|offset| jobs_at + 1 + offset)?;
    has_tail(artifacts_at).then_some((jobs_at, artifacts_at))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_job_id() {
        let id = extract_job_id(
            "portal",
            "https://gitlab.example.com/web/portal/-/jobs/123/artifacts/download",
        )
        .unwrap();
        assert_eq!(id, 123);
    }

    #[test]
    fn test_extract_job_id_raw_artifact_path() {
        let id = extract_job_id(
            "portal",
            "https://gitlab.example.com/web/portal/-/jobs/98765/artifacts/raw/dist/site.zip",
        )
        .unwrap();
        assert_eq!(id, 98765);
    }

    #[test]
    fn test_trailing_slash_after_artifacts() {
        let id = extract_job_id("p", "https://gitlab.example.com/g/p/-/jobs/5/artifacts/").unwrap();
        assert_eq!(id, 5);
    }

    #[test]
    fn test_missing_jobs_marker() {
        let err = extract_job_id(
            "portal",
            "https://gitlab.example.com/web/portal/-/pipelines/123/artifacts/download",
        )
        .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidArtifactUrl { .. }));
    }

    #[test]
    fn test_missing_artifacts_marker() {
        let err = extract_job_id("portal", "https://gitlab.example.com/web/portal/-/jobs/123/download")
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidArtifactUrl { .. }));
    }

    #[test]
    fn test_artifacts_before_jobs() {
        let err = extract_job_id("p", "https://gitlab.example.com/artifacts/x/jobs/12").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidArtifactUrl { .. }));
    }

    #[test]
    fn test_nothing_after_artifacts() {
        let err = extract_job_id("p", "https://gitlab.example.com/g/p/-/jobs/12/artifacts").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidArtifactUrl { .. }));
    }

    #[test]
    fn test_project_named_jobs() {
        let id = extract_job_id(
            "jobs",
            "https://gitlab.example.com/web/jobs/-/jobs/123/artifacts/download",
        )
        .unwrap();
        assert_eq!(id, 123);
    }

    #[test]
    fn test_group_named_jobs() {
        let id = extract_job_id(
            "portal",
            "https://gitlab.example.com/jobs/portal/-/jobs/77/artifacts/raw/site.zip",
        )
        .unwrap();
        assert_eq!(id, 77);
    }

    #[test]
    fn test_jobs_without_project_path() {
        let err = extract_job_id("p", "https://gitlab.example.com/jobs/12/artifacts/download").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidArtifactUrl { .. }));
    }

    #[test]
    fn test_relative_url_is_invalid() {
        let err = extract_job_id("p", "/g/p/-/jobs/12/artifacts/download").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidArtifactUrl { .. }));
    }

    #[test]
    fn test_non_numeric_job_id() {
        let err = extract_job_id("p", "https://gitlab.example.com/g/p/-/jobs/latest/artifacts/download")
            .unwrap_err();
        match err {
            ProviderError::InvalidJobId { raw, .. } => assert_eq!(raw, "latest"),
            other => panic!("expected InvalidJobId, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_job_id() {
        let err = extract_job_id("p", "https://gitlab.example.com/g/p/-/jobs/artifacts/download")
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidJobId { .. }));
    }

    #[test]
    fn test_job_id_spanning_segments() {
        let err = extract_job_id("p", "https://gitlab.example.com/g/p/-/jobs/12/x/artifacts/download")
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidJobId { .. }));
    }
}

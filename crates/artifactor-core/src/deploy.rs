//! One-shot deployment: resolve the project's release artifact and
//! materialize it into the mount volume

use crate::config::ProjectConfig;
use crate::error::ProviderError;
use crate::materialize::{MaterializeError, copy_assets, extract_zip};
use crate::provider::ClientRegistry;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info};

/// Result of a successful deployment run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployOutcome {
    /// Artifact was extracted; counts of files unzipped and assets copied
    Deployed { files: usize, assets: usize },
    /// The newest release carries no qualifying artifact
    NothingToDeploy,
}

/// Errors that abort a deployment run
#[derive(Debug, Error)]
pub enum DeployError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Materialize(#[from] MaterializeError),
}

/// Deploy the project described by `project` using a connected registry.
///
/// When an artifact is found it is extracted below the mount volume and the
/// additional assets are copied next to it. The asset copy runs even if the
/// extraction failed; the first failure is returned.
///
/// # Errors
///
/// - `DeployError::Provider` if the provider is not configured or resolution
///   fails
/// - `DeployError::Materialize` if extraction or asset copy fails
pub fn deploy(registry: &ClientRegistry, project: &ProjectConfig) -> Result<DeployOutcome, DeployError> {
    info!(
        project = %project.project,
        mount_volume = %project.mount_volume,
        source_path = %project.source_path,
        "deploying"
    );

    let Some(body) = registry.fetch(&project.request())? else {
        info!("not found assets");
        return Ok(DeployOutcome::NothingToDeploy);
    };

    let volume = mount_volume_path(&project.mount_volume);
    let extracted = extract_zip(&volume, &project.source_path, &body);
    if let Err(e) = &extracted {
        error!(error = %e, "extract failed");
    }
    let copied = copy_assets(&project.assets_source, &project.assets_destination, &volume);
    if let Err(e) = &copied {
        error!(error = %e, "copy assets failed");
    }

    let files = extracted?;
    let assets = copied?;
    Ok(DeployOutcome::Deployed { files, assets })
}

fn mount_volume_path(mount_volume: &str) -> PathBuf {
    if mount_volume.is_empty() {
        PathBuf::from(".")
    } else {
        PathBuf::from(mount_volume)
    }
}

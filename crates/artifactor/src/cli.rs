//! Command-line entry point

use anyhow::{Context, Result};
use artifactor_core::config::{DEFAULT_CONFIG_PATH, load_deploy_config};
use artifactor_core::{ClientRegistry, DeployOutcome, ProjectConfig, deploy, logging};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// artifactor - deploy the newest release artifact of a project
#[derive(Parser, Debug)]
#[command(
    name = "artifactor",
    version,
    about = "Deploy the newest GitHub or GitLab release artifact into a volume",
    long_about = "Resolves the project named by the PROVIDER, GROUP and PROJECT environment \
                  variables, downloads the zip artifact of its newest release and extracts \
                  it (optionally only SOURCE_PATH) into VOLUME. Files from ASSETS_SRC are \
                  copied to VOLUME/ASSETS_DST afterwards."
)]
pub struct Cli {
    /// Path to the deploy config YAML
    #[arg(long, env = "ARTIFACTOR_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

impl Cli {
    /// Run one deployment
    pub fn execute(self) -> Result<()> {
        logging::init();
        log_startup_paths();

        let config = load_deploy_config(&self.config)
            .with_context(|| format!("failed to load deploy config {}", self.config.display()))?;
        let project = ProjectConfig::from_env();
        info!(
            provider = %project.provider,
            group = %project.group,
            project = %project.project,
            "project"
        );

        let registry = ClientRegistry::connect(&config);
        match deploy(&registry, &project).context("deployment failed")? {
            DeployOutcome::Deployed { files, assets } => {
                info!(files, assets, "deployed");
            }
            DeployOutcome::NothingToDeploy => {}
        }

        info!("OK");
        Ok(())
    }
}

fn log_startup_paths() {
    let executable = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.display().to_string()))
        .unwrap_or_default();
    let home = dirs::home_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    info!(executable_path = %executable, home_path = %home, "startup");
}

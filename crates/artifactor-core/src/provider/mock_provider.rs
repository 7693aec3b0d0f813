//! Mock artifact provider for testing

use super::traits::{ArtifactProvider, FetchResult};
use crate::error::ProviderError;
use std::sync::{Arc, Mutex};

/// Mock artifact provider for testing. Returns canned data.
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Artifact to return from load_assets (`None` = nothing to deploy)
    pub artifact: Option<Vec<u8>>,
    /// If set, load_assets returns this error message as `DownloadFailed`
    pub error: Option<String>,
    /// Track calls for verification
    pub call_log: Arc<Mutex<Vec<MockCall>>>,
}

/// Record of method calls for test assertions
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    LoadAssets {
        group: String,
        project: String,
        mode: String,
    },
}

impl MockProvider {
    /// Create a new mock provider with nothing to deploy
    pub fn new() -> Self {
        Self {
            artifact: None,
            error: None,
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider returning the given artifact bytes
    pub fn with_artifact(artifact: Vec<u8>) -> Self {
        Self {
            artifact: Some(artifact),
            ..Self::new()
        }
    }

    /// Set the error that load_assets should return
    pub fn with_error(mut self, error: String) -> Self {
        self.error = Some(error);
        self
    }

    /// Get a copy of the call log for assertions
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Clear the call log
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear();
    }

    fn log_call(&self, call: MockCall) {
        self.call_log.lock().unwrap().push(call);
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "MockProvider"
    }

    fn load_assets(&self, group: &str, project: &str, mode: &str) -> FetchResult {
        self.log_call(MockCall::LoadAssets {
            group: group.to_string(),
            project: project.to_string(),
            mode: mode.to_string(),
        });

        if let Some(err) = &self.error {
            return Err(ProviderError::DownloadFailed {
                project: project.to_string(),
                message: err.clone(),
                source: None,
            });
        }

        Ok(self.artifact.clone())
    }
}

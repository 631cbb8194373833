//! Container runtime client contract
//!
//! The task engine only needs two runtime operations: starting a container
//! that was already created, and listing containers carrying a label.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// State string reported by the runtime for a live container
pub const RUNNING_STATE: &str = "running";

/// Container summary as returned by a label listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerDescriptor {
    /// Container ID
    pub id: Option<String>,
    /// Runtime state ("created", "running", "exited", "dead", ...)
    pub state: Option<String>,
}

impl ContainerDescriptor {
    pub fn with_state(state: impl Into<String>) -> Self {
        Self {
            state: Some(state.into()),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// State string, `"unknown"` when the runtime did not report one
    pub fn state(&self) -> &str {
        self.state.as_deref().unwrap_or("unknown")
    }

    pub fn is_running(&self) -> bool {
        self.state.as_deref() == Some(RUNNING_STATE)
    }
}

/// Failure of a runtime client call
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Container runtime not available: {0}")]
    Unavailable(String),

    #[error("No such container: {0}")]
    NotFound(String),

    #[error("Failed to start container {container}: {message}")]
    StartFailed { container: String, message: String },

    #[error("Container runtime error: {0}")]
    Api(String),
}

/// Runtime client trait - implement to add new container backends
#[async_trait]
pub trait RuntimeClient: Send + Sync {
    /// Start an already created container
    async fn start_container(&self, container_id: &str) -> Result<(), RuntimeError>;

    /// List all containers (running or not) labelled `key=value`
    async fn list_containers_by_label(
        &self,
        key: &str,
        value: &str,
    ) -> Result<Vec<ContainerDescriptor>, RuntimeError>;

    /// Get runtime name
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_state() {
        assert!(ContainerDescriptor::with_state("running").is_running());
        assert!(!ContainerDescriptor::with_state("exited").is_running());
        assert_eq!(ContainerDescriptor::default().state(), "unknown");
    }

    #[test]
    fn test_start_failed_message() {
        let err = RuntimeError::StartFailed {
            container: "abc".to_string(),
            message: "port is already allocated".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to start container abc: port is already allocated"
        );
    }
}

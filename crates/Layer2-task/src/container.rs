//! Docker runtime client backed by bollard

use crate::runtime::{ContainerDescriptor, RuntimeClient, RuntimeError};
use async_trait::async_trait;
use bollard::container::{ListContainersOptions, StartContainerOptions};
use bollard::models::ContainerSummary;
use bollard::Docker;
use std::collections::HashMap;
use tracing::{debug, info};

/// Docker runtime client
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Connect using the local defaults (unix socket / named pipe, or DOCKER_HOST)
    pub fn connect() -> Result<Self, RuntimeError> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| RuntimeError::Unavailable(e.to_string()))?;
        Ok(Self { docker })
    }

    /// Check if the daemon answers
    pub async fn is_available(&self) -> bool {
        self.docker.ping().await.is_ok()
    }
}

#[async_trait]
impl RuntimeClient for DockerRuntime {
    async fn start_container(&self, container_id: &str) -> Result<(), RuntimeError> {
        info!("Starting container: {}", container_id);

        self.docker
            .start_container(container_id, None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| match e {
                bollard::errors::Error::DockerResponseServerError {
                    status_code: 404,
                    message,
                } => RuntimeError::NotFound(message),
                other => RuntimeError::StartFailed {
                    container: container_id.to_string(),
                    message: other.to_string(),
                },
            })
    }

    async fn list_containers_by_label(
        &self,
        key: &str,
        value: &str,
    ) -> Result<Vec<ContainerDescriptor>, RuntimeError> {
        let mut filters = HashMap::new();
        filters.insert("label".to_string(), vec![format!("{}={}", key, value)]);

        let options = ListContainersOptions {
            all: true,
            filters,
            ..Default::default()
        };

        let summaries = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(|e| RuntimeError::Api(e.to_string()))?;

        debug!("{} container(s) labelled {}={}", summaries.len(), key, value);

        Ok(summaries.into_iter().map(ContainerDescriptor::from).collect())
    }

    fn name(&self) -> &'static str {
        "docker"
    }
}

impl From<ContainerSummary> for ContainerDescriptor {
    fn from(summary: ContainerSummary) -> Self {
        Self {
            id: summary.id,
            state: summary.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_from_summary() {
        let summary = ContainerSummary {
            id: Some("f00d".to_string()),
            names: Some(vec!["/probe".to_string()]),
            state: Some("exited".to_string()),
            ..Default::default()
        };

        let descriptor = ContainerDescriptor::from(summary);
        assert_eq!(descriptor.id.as_deref(), Some("f00d"));
        assert_eq!(descriptor.state(), "exited");
    }

    #[test]
    fn test_descriptor_from_summary_without_state() {
        let descriptor = ContainerDescriptor::from(ContainerSummary::default());
        assert!(descriptor.id.is_none());
        assert_eq!(descriptor.state(), "unknown");
    }
}

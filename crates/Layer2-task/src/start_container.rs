//! Start-container test: start the container, then wait for its worker
//!
//! First step starts the container and records the start time. Every later
//! step checks whether the worker registered, otherwise inspects the
//! container found under the test instance label:
//!
//! - no container: destroyed prematurely (failure)
//! - one running container: keep waiting until the timeout elapses
//! - one container in any other state: exited prematurely (failure)
//! - several containers: duplicated instance id (internal error)

use crate::clock::{Clock, SystemClock};
use crate::handler::TaskHandler;
use crate::state::Phase;
use crate::task::{Progress, TaskContext, TaskError, TaskStep, TestTask};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dockprobe_foundation::{ProbeConfig, DEFAULT_INSTANCE_LABEL, DEFAULT_WORKER_WAIT_TIMEOUT_SECS};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

/// Step logic of the start-container test
pub struct StartContainer {
    container_id: String,
    instance_id: Uuid,
    instance_label: String,
    timeout: Duration,
    clock: Arc<dyn Clock>,
    started_at: Option<DateTime<Utc>>,
    clock_skew_reported: bool,
}

impl StartContainer {
    pub fn new(container_id: impl Into<String>, instance_id: Uuid) -> Self {
        Self {
            container_id: container_id.into(),
            instance_id,
            instance_label: DEFAULT_INSTANCE_LABEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_WORKER_WAIT_TIMEOUT_SECS),
            clock: Arc::new(SystemClock),
            started_at: None,
            clock_skew_reported: false,
        }
    }

    /// Create from the probe configuration (label key and timeout)
    pub fn from_config(
        container_id: impl Into<String>,
        instance_id: Uuid,
        config: &ProbeConfig,
    ) -> Self {
        Self::new(container_id, instance_id)
            .with_instance_label(config.instance_label.clone())
            .with_timeout(config.worker_wait_timeout())
    }

    pub fn with_instance_label(mut self, label: impl Into<String>) -> Self {
        self.instance_label = label.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Wrap into a task starting in [`Phase::Start`]
    pub fn into_task(self, handler: Arc<dyn TaskHandler>) -> TestTask<Self> {
        TestTask::new(handler, Phase::Start, self)
    }

    async fn start(&mut self, ctx: &mut TaskContext<'_>) -> Result<Progress, TaskError> {
        let client = ctx.handler().runtime_client();

        self.started_at = Some(self.clock.now());
        client.start_container(&self.container_id).await?;

        info!(
            "Task {} started container {} on {} (instance {})",
            ctx.id(),
            self.container_id,
            client.name(),
            self.instance_id
        );
        ctx.notify_phase("Waiting for worker to connect", Phase::WaitForWorker);

        Ok(Progress::Pending)
    }

    async fn poll(
        &mut self,
        ctx: &mut TaskContext<'_>,
        started_at: DateTime<Utc>,
    ) -> Result<Progress, TaskError> {
        if ctx.handler().is_worker_registered() {
            return Ok(Progress::Succeeded("Worker connected".to_string()));
        }

        let client = ctx.handler().runtime_client();
        let containers = client
            .list_containers_by_label(&self.instance_label, &self.instance_id.to_string())
            .await?;

        match containers.as_slice() {
            [] => Err(TaskError::failed("Container was prematurely destroyed.")),
            [container] if container.is_running() => {
                let elapsed = self.clock.now() - started_at;
                if elapsed < chrono::Duration::zero() && !self.clock_skew_reported {
                    self.clock_skew_reported = true;
                    ctx.warn("System clock moved backwards while waiting for the worker");
                }

                debug!(
                    "Container {} running for {}s, waiting for worker",
                    self.container_id,
                    elapsed.num_seconds()
                );

                let timeout_secs = i64::try_from(self.timeout.as_secs()).unwrap_or(i64::MAX);
                if elapsed.num_seconds() > timeout_secs {
                    return Err(TaskError::failed(format!(
                        "Timeout: no worker connection after {} seconds.",
                        self.timeout.as_secs()
                    )));
                }
                Ok(Progress::Pending)
            }
            [container] => Err(TaskError::failed(format!(
                "Container exited prematurely ({})",
                container.state()
            ))),
            _ => Err(TaskError::internal(format!(
                "Multiple containers found for the test instance id: {}",
                self.instance_id
            ))),
        }
    }
}

#[async_trait]
impl TaskStep for StartContainer {
    async fn work(&mut self, ctx: &mut TaskContext<'_>) -> Result<Progress, TaskError> {
        match self.started_at {
            None => self.start(ctx).await,
            Some(started_at) => self.poll(ctx, started_at).await,
        }
    }

    fn name(&self) -> &'static str {
        "start-container"
    }
}

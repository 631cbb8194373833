//! Test task engine
//!
//! A [`TestTask`] wraps task-specific step logic ([`TaskStep`]) with the
//! shared lifecycle: exclusive locking, phase/status bookkeeping, warnings,
//! and translation of step errors into FAILURE notifications.
//!
//! The external driver calls [`TestTask::execute`] until the returned status
//! is terminal. Each call runs exactly one step under the task lock.

use crate::handler::{StatusNotification, TaskHandler};
use crate::runtime::RuntimeError;
use crate::state::{Phase, Status};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Unique identifier for a test task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub Uuid);

impl TaskId {
    /// Generate a new random TaskId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Result of one successful step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// More polling needed
    Pending,

    /// Test passed, with the message to report
    Succeeded(String),
}

/// Error raised by step logic
#[derive(Error, Debug)]
pub enum TaskError {
    /// Failure detected by the task itself
    #[error("{0}")]
    Failed(String),

    /// Runtime client call failed
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Impossible state; surfaced as an [`InvariantViolation`]
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TaskError {
    pub fn failed(message: impl Into<String>) -> Self {
        TaskError::Failed(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        TaskError::Internal(message.into())
    }
}

/// Fatal engine condition, distinct from an ordinary task failure.
///
/// Indicates a defect in the driver or elsewhere in the system, never a
/// problem with the container or worker under test.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Cannot run task in status {0}")]
    NotPending(Status),

    #[error("Internal task error: {0}")]
    Internal(String),
}

/// Task-specific logic driven by a [`TestTask`]
#[async_trait]
pub trait TaskStep: Send {
    /// Perform one polling step.
    ///
    /// Only called while the task is PENDING and its lock is held.
    async fn work(&mut self, ctx: &mut TaskContext<'_>) -> Result<Progress, TaskError>;

    /// Get step name (for logs)
    fn name(&self) -> &'static str;
}

#[derive(Debug)]
struct TaskState {
    phase: Phase,
    status: Status,
    warnings: Vec<String>,
}

struct Inner<S> {
    state: TaskState,
    step: S,
}

/// Access to a task's state, only handed out while the task lock is held
pub struct TaskContext<'a> {
    id: TaskId,
    state: &'a mut TaskState,
    handler: &'a Arc<dyn TaskHandler>,
}

impl<'a> TaskContext<'a> {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn handler(&self) -> &Arc<dyn TaskHandler> {
        self.handler
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Notify a user message for the current phase
    pub fn notify(&mut self, message: &str) {
        self.send(message, None);
    }

    /// Notify a user message and move to a new phase
    pub fn notify_phase(&mut self, message: &str, phase: Phase) {
        debug_assert!(
            phase >= self.state.phase,
            "phase regressed from {:?} to {:?}",
            self.state.phase,
            phase
        );
        self.state.phase = phase;
        self.send(message, None);
    }

    /// Record a warning, carried by the next notification
    pub fn warn(&mut self, warning: impl Into<String>) {
        self.state.warnings.push(warning.into());
    }

    fn succeed(&mut self, message: &str) {
        self.state.status = Status::Success;
        self.send(message, None);
    }

    fn fail(&mut self, error: &TaskError) {
        self.state.status = Status::Failure;
        self.send(&error.to_string(), Some(error));
    }

    fn send(&self, message: &str, failure: Option<&TaskError>) {
        self.handler.notify_status(&StatusNotification {
            phase: self.state.phase,
            status: self.state.status,
            message,
            failure,
            warnings: &self.state.warnings,
        });
    }
}

/// A container test task: shared lifecycle around a [`TaskStep`]
pub struct TestTask<S> {
    id: TaskId,
    handler: Arc<dyn TaskHandler>,
    inner: Mutex<Inner<S>>,
}

impl<S: TaskStep> TestTask<S> {
    /// Create a new PENDING task in its initial phase
    pub fn new(handler: Arc<dyn TaskHandler>, initial_phase: Phase, step: S) -> Self {
        Self {
            id: TaskId::new(),
            handler,
            inner: Mutex::new(Inner {
                state: TaskState {
                    phase: initial_phase,
                    status: Status::Pending,
                    warnings: Vec::new(),
                },
                step,
            }),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub async fn status(&self) -> Status {
        self.inner.lock().await.state.status
    }

    pub async fn phase(&self) -> Phase {
        self.inner.lock().await.state.phase
    }

    pub async fn warnings(&self) -> Vec<String> {
        self.inner.lock().await.state.warnings.clone()
    }

    /// Run one step of the task.
    ///
    /// Step errors never escape: they become a FAILURE notification and
    /// `Ok(Status::Failure)`. Only engine invariant breaches are returned as
    /// errors, and the task is left terminal when that happens.
    ///
    /// Panics raised by the step or the handler are not caught and unwind
    /// through the caller.
    pub async fn execute(&self) -> Result<Status, InvariantViolation> {
        let mut guard = self.inner.lock().await;
        let Inner { state, step } = &mut *guard;

        if !state.status.is_pending() {
            error!(
                "Task {} ({}) executed in terminal status {}",
                self.id,
                step.name(),
                state.status
            );
            return Err(InvariantViolation::NotPending(state.status));
        }

        let name = step.name();
        let mut ctx = TaskContext {
            id: self.id,
            state,
            handler: &self.handler,
        };

        match step.work(&mut ctx).await {
            Ok(Progress::Pending) => {
                debug!("Task {} ({}) still pending in phase {}", self.id, name, ctx.phase());
                Ok(Status::Pending)
            }
            Ok(Progress::Succeeded(message)) => {
                info!("Task {} ({}) succeeded: {}", self.id, name, message);
                ctx.succeed(&message);
                Ok(Status::Success)
            }
            Err(TaskError::Internal(message)) => {
                error!("Task {} ({}) hit an internal error: {}", self.id, name, message);
                ctx.state.status = Status::Failure;
                Err(InvariantViolation::Internal(message))
            }
            Err(err) => {
                warn!("Processing of task {} ({}) failed: {}", self.id, name, err);
                ctx.fail(&err);
                Ok(Status::Failure)
            }
        }
    }
}

//! Polling driver - calls `execute()` until the task is terminal

use crate::state::Status;
use crate::task::{InvariantViolation, TaskStep, TestTask};
use std::time::Duration;
use tracing::{debug, info};

/// Drive a task to a terminal status, sleeping `interval` between polls.
///
/// Stops early on an invariant violation. Dropping the returned future is
/// the way to cancel.
pub async fn drive<S: TaskStep>(
    task: &TestTask<S>,
    interval: Duration,
) -> Result<Status, InvariantViolation> {
    let mut polls: u64 = 0;
    loop {
        polls += 1;
        let status = task.execute().await?;
        if status.is_terminal() {
            info!("Task {} finished with {} after {} poll(s)", task.id(), status, polls);
            return Ok(status);
        }
        debug!("Task {} pending, next poll in {:?}", task.id(), interval);
        tokio::time::sleep(interval).await;
    }
}

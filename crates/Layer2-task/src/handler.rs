//! Test task handler contract and status notifications

use crate::runtime::RuntimeClient;
use crate::state::{Phase, Status};
use crate::task::TaskError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::sync::Arc;

/// Snapshot of a task's state sent to its handler.
///
/// Borrowed from the task while its lock is held, so it always matches the
/// task's own phase and status.
#[derive(Debug, Clone, Copy)]
pub struct StatusNotification<'a> {
    pub phase: Phase,
    pub status: Status,
    pub message: &'a str,
    /// Set only on failure notifications
    pub failure: Option<&'a TaskError>,
    /// Every warning accumulated so far, in insertion order
    pub warnings: &'a [String],
}

/// Receiver of test task notifications.
///
/// Shared by every task of a test run; tasks only invoke it.
pub trait TaskHandler: Send + Sync {
    /// Runtime client used to drive the test container
    fn runtime_client(&self) -> Arc<dyn RuntimeClient>;

    /// Whether the worker inside the test container has registered
    fn is_worker_registered(&self) -> bool;

    /// Receive a status notification
    fn notify_status(&self, notification: &StatusNotification<'_>);
}

/// Owned copy of a [`StatusNotification`] for handlers that keep history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub phase: Phase,
    pub status: Status,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    pub warnings: Vec<String>,
    pub reported_at: DateTime<Utc>,
}

impl From<&StatusNotification<'_>> for StatusReport {
    fn from(notification: &StatusNotification<'_>) -> Self {
        Self {
            phase: notification.phase,
            status: notification.status,
            message: notification.message.to_string(),
            failure: notification.failure.map(|e| error_chain(e)),
            warnings: notification.warnings.to_vec(),
            reported_at: Utc::now(),
        }
    }
}

/// Render an error and its sources as `outer: cause: root cause`
fn error_chain(error: &dyn StdError) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_from_notification() {
        let warnings = vec!["slow image pull".to_string()];
        let error = TaskError::failed("Container was prematurely destroyed.");
        let notification = StatusNotification {
            phase: Phase::WaitForWorker,
            status: Status::Failure,
            message: "Container was prematurely destroyed.",
            failure: Some(&error),
            warnings: &warnings,
        };

        let report = StatusReport::from(&notification);
        assert_eq!(report.status, Status::Failure);
        assert_eq!(report.warnings, warnings);
        assert_eq!(
            report.failure.as_deref(),
            Some("Container was prematurely destroyed.")
        );
    }

    #[derive(Debug, thiserror::Error)]
    #[error("listing failed")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn test_error_chain_walks_sources() {
        let error = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        ));
        assert_eq!(error_chain(&error), "listing failed: connection reset by peer");
    }

    #[test]
    fn test_runtime_failure_is_readable() {
        let error = TaskError::from(crate::runtime::RuntimeError::StartFailed {
            container: "abc".to_string(),
            message: "no such image".to_string(),
        });
        let notification = StatusNotification {
            phase: Phase::Start,
            status: Status::Failure,
            message: "failed",
            failure: Some(&error),
            warnings: &[],
        };

        let failure = StatusReport::from(&notification).failure.unwrap();
        assert_eq!(failure, "Failed to start container abc: no such image");
        assert!(!failure.contains("StartFailed"));
    }

    #[test]
    fn test_report_json_omits_missing_failure() {
        let notification = StatusNotification {
            phase: Phase::Start,
            status: Status::Pending,
            message: "starting",
            failure: None,
            warnings: &[],
        };

        let json = serde_json::to_value(StatusReport::from(&notification)).unwrap();
        assert_eq!(json["status"], "PENDING");
        assert!(json.get("failure").is_none());
    }
}

//! Console task handler - logs notifications and keeps the latest report

use dockprobe_task::{RuntimeClient, Status, StatusNotification, StatusReport, TaskHandler};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub struct ConsoleHandler {
    runtime: Arc<dyn RuntimeClient>,
    registered: Arc<AtomicBool>,
    last: Mutex<Option<StatusReport>>,
}

impl ConsoleHandler {
    pub fn new(runtime: Arc<dyn RuntimeClient>, registered: Arc<AtomicBool>) -> Self {
        Self {
            runtime,
            registered,
            last: Mutex::new(None),
        }
    }

    pub fn last_report(&self) -> Option<StatusReport> {
        self.last.lock().clone()
    }
}

impl TaskHandler for ConsoleHandler {
    fn runtime_client(&self) -> Arc<dyn RuntimeClient> {
        self.runtime.clone()
    }

    fn is_worker_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }

    fn notify_status(&self, notification: &StatusNotification<'_>) {
        match notification.status {
            Status::Failure => warn!(
                "[{}] {} {}: {}",
                notification.phase,
                notification.status.symbol(),
                notification.status,
                notification.message
            ),
            _ => info!(
                "[{}] {} {}: {}",
                notification.phase,
                notification.status.symbol(),
                notification.status,
                notification.message
            ),
        }
        for warning in notification.warnings {
            warn!("  warning: {}", warning);
        }

        *self.last.lock() = Some(StatusReport::from(notification));
    }
}

/// Render a report for terminal output
pub fn render_report(report: &StatusReport) -> String {
    let mut out = format!(
        "{} {} ({}): {}",
        report.status.symbol(),
        report.status,
        report.phase,
        report.message
    );
    for warning in &report.warnings {
        out.push_str("\n  warning: ");
        out.push_str(warning);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockprobe_task::{ContainerDescriptor, Phase, RuntimeError};

    struct NoopRuntime;

    #[async_trait::async_trait]
    impl RuntimeClient for NoopRuntime {
        async fn start_container(&self, _container_id: &str) -> Result<(), RuntimeError> {
            Ok(())
        }

        async fn list_containers_by_label(
            &self,
            _key: &str,
            _value: &str,
        ) -> Result<Vec<ContainerDescriptor>, RuntimeError> {
            Ok(vec![])
        }

        fn name(&self) -> &'static str {
            "noop"
        }
    }

    #[test]
    fn test_keeps_latest_report() {
        let flag = Arc::new(AtomicBool::new(false));
        let handler = ConsoleHandler::new(Arc::new(NoopRuntime), flag.clone());
        assert!(handler.last_report().is_none());
        assert!(!handler.is_worker_registered());

        let warnings = vec!["slow start".to_string()];
        handler.notify_status(&StatusNotification {
            phase: Phase::WaitForWorker,
            status: Status::Success,
            message: "Worker connected",
            failure: None,
            warnings: &warnings,
        });

        let report = handler.last_report().unwrap();
        assert_eq!(report.status, Status::Success);
        assert_eq!(report.warnings, warnings);

        flag.store(true, Ordering::SeqCst);
        assert!(handler.is_worker_registered());
    }

    #[test]
    fn test_render_report() {
        let warnings = vec!["slow start".to_string()];
        let report = StatusReport::from(&StatusNotification {
            phase: Phase::WaitForWorker,
            status: Status::Failure,
            message: "Container exited prematurely (exited)",
            failure: None,
            warnings: &warnings,
        });

        assert_eq!(
            render_report(&report),
            "✗ Failure (Wait for worker): Container exited prematurely (exited)\n  warning: slow start"
        );
    }
}

//! In-memory collaborators for unit tests

use crate::clock::Clock;
use crate::handler::{StatusNotification, StatusReport, TaskHandler};
use crate::runtime::{ContainerDescriptor, RuntimeClient, RuntimeError};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Runtime returning a configurable listing and recording every call
#[derive(Default)]
pub struct ScriptedRuntime {
    start_calls: Mutex<Vec<String>>,
    list_calls: Mutex<Vec<(String, String)>>,
    containers: Mutex<Vec<ContainerDescriptor>>,
    start_error: Mutex<Option<String>>,
    list_error: Mutex<Option<String>>,
}

impl ScriptedRuntime {
    pub fn set_containers(&self, containers: Vec<ContainerDescriptor>) {
        *self.containers.lock() = containers;
    }

    pub fn fail_start(&self, message: &str) {
        *self.start_error.lock() = Some(message.to_string());
    }

    pub fn fail_list(&self, message: &str) {
        *self.list_error.lock() = Some(message.to_string());
    }

    pub fn start_calls(&self) -> Vec<String> {
        self.start_calls.lock().clone()
    }

    pub fn list_calls(&self) -> Vec<(String, String)> {
        self.list_calls.lock().clone()
    }
}

#[async_trait]
impl RuntimeClient for ScriptedRuntime {
    async fn start_container(&self, container_id: &str) -> Result<(), RuntimeError> {
        self.start_calls.lock().push(container_id.to_string());
        match self.start_error.lock().clone() {
            Some(message) => Err(RuntimeError::StartFailed {
                container: container_id.to_string(),
                message,
            }),
            None => Ok(()),
        }
    }

    async fn list_containers_by_label(
        &self,
        key: &str,
        value: &str,
    ) -> Result<Vec<ContainerDescriptor>, RuntimeError> {
        self.list_calls
            .lock()
            .push((key.to_string(), value.to_string()));
        if let Some(message) = self.list_error.lock().clone() {
            return Err(RuntimeError::Api(message));
        }
        Ok(self.containers.lock().clone())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Handler keeping every notification it receives
pub struct RecordingHandler {
    runtime: Arc<ScriptedRuntime>,
    registered: AtomicBool,
    reports: Mutex<Vec<StatusReport>>,
}

impl RecordingHandler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            runtime: Arc::new(ScriptedRuntime::default()),
            registered: AtomicBool::new(false),
            reports: Mutex::new(Vec::new()),
        })
    }

    pub fn runtime(&self) -> Arc<ScriptedRuntime> {
        self.runtime.clone()
    }

    pub fn set_worker_registered(&self, registered: bool) {
        self.registered.store(registered, Ordering::SeqCst);
    }

    pub fn reports(&self) -> Vec<StatusReport> {
        self.reports.lock().clone()
    }

    pub fn last_report(&self) -> Option<StatusReport> {
        self.reports.lock().last().cloned()
    }
}

impl TaskHandler for RecordingHandler {
    fn runtime_client(&self) -> Arc<dyn RuntimeClient> {
        self.runtime.clone()
    }

    fn is_worker_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }

    fn notify_status(&self, notification: &StatusNotification<'_>) {
        self.reports.lock().push(StatusReport::from(notification));
    }
}

/// Clock moved by hand
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Arc<Self> {
        let epoch = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        Arc::new(Self {
            now: Mutex::new(epoch),
        })
    }

    pub fn advance_secs(&self, secs: i64) {
        *self.now.lock() += Duration::seconds(secs);
    }

    pub fn rewind_secs(&self, secs: i64) {
        *self.now.lock() -= Duration::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

//! # dockprobe-task
//!
//! Container self-test engine for dockprobe.
//! Starts a disposable container and watches it until its worker registers
//! with the controlling server, the wait times out, or the container dies.
//!
//! ## Features
//!
//! - Generic test task lifecycle (`TestTask`) with exclusive locking
//! - Phase/status notifications with accumulated warnings
//! - Start-container polling protocol (`StartContainer`)
//! - Docker runtime client (bollard)
//! - Polling driver

pub mod clock;
pub mod container;
pub mod driver;
pub mod handler;
pub mod runtime;
pub mod start_container;
pub mod state;
pub mod task;

#[cfg(test)]
mod testing;

pub use clock::{Clock, SystemClock};
pub use container::DockerRuntime;
pub use driver::drive;
pub use handler::{StatusNotification, StatusReport, TaskHandler};
pub use runtime::{ContainerDescriptor, RuntimeClient, RuntimeError, RUNNING_STATE};
pub use start_container::StartContainer;
pub use state::{Phase, Status};
pub use task::{InvariantViolation, Progress, TaskContext, TaskError, TaskId, TaskStep, TestTask};

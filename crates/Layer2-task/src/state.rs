//! Test phase and status model

use serde::{Deserialize, Serialize};

/// Logical stage of a multi-step container test.
///
/// Variants are declared in lifecycle order; a task only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Starting the test container
    Start,

    /// Waiting for the worker inside the container to register
    WaitForWorker,
}

impl Phase {
    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::Start => "Start",
            Phase::WaitForWorker => "Wait for worker",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Outcome classification of a test task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Not finished yet
    #[default]
    Pending,

    /// Test passed
    Success,

    /// Test failed
    Failure,
}

impl Status {
    /// Check if this is a terminal status (cannot transition further)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Success | Status::Failure)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Status::Pending)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Success => "Success",
            Status::Failure => "Failure",
        }
    }

    /// Get a symbol for the status (for console output)
    pub fn symbol(&self) -> &'static str {
        match self {
            Status::Pending => "⟳",
            Status::Success => "✓",
            Status::Failure => "✗",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

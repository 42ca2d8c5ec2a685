//! Poll engine types

use crate::types::ServiceType;
use std::fmt;

/// Business operation of a façade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Missing,
    Future,
    Queue,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Future => "future",
            Self::Queue => "queue",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one scheduled operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId {
    pub service: ServiceType,
    pub server_id: u32,
    pub kind: OperationKind,
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{} {}", self.service, self.server_id, self.kind)
    }
}

/// Summary of a poll cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollStats {
    /// Operations that completed
    pub succeeded: usize,
    /// Operations that failed
    pub failed: usize,
    /// Points handed to the writer
    pub points_written: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl PollStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed operation
    pub fn add_success(&mut self, points: usize) {
        self.succeeded += 1;
        self.points_written += points;
    }

    /// Record a failed operation
    pub fn add_failure(&mut self) {
        self.failed += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }

    /// Total operations run
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

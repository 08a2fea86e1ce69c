//! Timer state structure

use serde::{Deserialize, Serialize};

use crate::utils::format_duration;

/// Tracking status of the session timer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Snapshot of the session timer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub status: TimerStatus,
    pub elapsed_seconds: u64,
    pub subject: Option<String>,
    pub topic: Option<String>,
}

impl TimerState {
    /// Create an idle timer with nothing elapsed
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn is_idle(&self) -> bool {
        self.status == TimerStatus::Idle
    }

    /// Elapsed time as shown on the dashboard
    pub fn display(&self) -> String {
        format_duration(self.elapsed_seconds)
    }
}

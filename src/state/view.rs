//! Rendered snapshot of the controllers, as the host surface shows it

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shutdown_schedule::SchedulePhase;

/// Which controls are currently usable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub start_anti_sleep: bool,
    pub stop_anti_sleep: bool,
    pub schedule_shutdown: bool,
    /// Hour/minute inputs; locked while a shutdown is pending
    pub offset_inputs: bool,
    pub cancel_shutdown: bool,
}

/// Anti-sleep part of the view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntiSleepView {
    pub active: bool,
    pub interval_seconds: u64,
}

/// Shutdown part of the view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShutdownView {
    pub phase: SchedulePhase,
    pub target_time: Option<DateTime<Utc>>,
    pub remaining_seconds: Option<u64>,
    /// Default offset offered by the inputs
    pub hours: u32,
    pub minutes: u32,
}

/// Full status snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
    pub controls: Controls,
    /// Countdown or terminal message; empty before the first schedule
    pub status_text: String,
    pub anti_sleep: AntiSleepView,
    pub shutdown: ShutdownView,
    /// Recent OS call failures
    pub errors: Vec<String>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

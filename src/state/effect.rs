//! Side effects requested by controller transitions

use serde::{Deserialize, Serialize};

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// A one-time message shown to the user after a transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

/// Work a transition hands back to the event loop.
///
/// Transitions never touch the OS themselves; the loop executes these against
/// an `OsGateway` in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Press then release the left button at the given position
    Click { x: i32, y: i32 },
    /// Ask the OS to power off after the given delay
    ScheduleShutdown { delay_seconds: u64 },
    /// Abort a pending OS shutdown
    AbortShutdown,
    /// Surface a notice to whoever triggered the transition
    Notify(Notice),
}

impl Effect {
    /// Whether executing this effect reaches the operating system
    pub fn touches_os(&self) -> bool {
        !matches!(self, Effect::Notify(_))
    }
}

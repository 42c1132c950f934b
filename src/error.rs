//! Controller rejection errors

use thiserror::Error;

use crate::state::anti_sleep::{MAX_INTERVAL_SECS, MIN_INTERVAL_SECS};

/// Reasons a control action is refused without changing any state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error(
        "click interval must be between {min} and {max} seconds, got {0}",
        min = MIN_INTERVAL_SECS,
        max = MAX_INTERVAL_SECS
    )]
    IntervalOutOfRange(u64),

    #[error("shutdown offset must be 0-23 hours and 0-59 minutes, got {hours}h {minutes}m")]
    OffsetOutOfRange { hours: u32, minutes: u32 },

    #[error("shutdown delay cannot be zero")]
    ZeroOffset,

    #[error("anti-sleep is already running")]
    AntiSleepActive,

    #[error("a shutdown is already scheduled")]
    ShutdownPending,

    #[error("no shutdown is scheduled")]
    NoShutdownScheduled,
}

impl ControlError {
    /// Whether the error comes from bad input rather than the current state
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::IntervalOutOfRange(_) | Self::OffsetOutOfRange { .. } | Self::ZeroOffset
        )
    }
}

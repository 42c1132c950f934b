//! Delayed shutdown schedule and countdown

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::effect::{Effect, Notice};
use crate::error::ControlError;

pub const MAX_HOURS: u32 = 23;
pub const MAX_MINUTES: u32 = 59;

/// Status text once the countdown has run out
pub const SHUTTING_DOWN_TEXT: &str = "Shutting down...";
/// Status text after a cancel
pub const CANCELLED_TEXT: &str = "Shutdown cancelled";

/// Where the schedule is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulePhase {
    /// Nothing pending
    Idle,
    /// OS shutdown requested, countdown running
    Scheduled,
    /// Countdown reached zero; the OS is expected to power off
    Fired,
}

/// Render a second count as zero-padded `HH:MM:SS`
pub fn format_countdown(remaining_seconds: u64) -> String {
    let hours = remaining_seconds / 3600;
    let minutes = (remaining_seconds % 3600) / 60;
    let seconds = remaining_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Whole seconds in `remaining`, rounded to the nearest second.
///
/// Timer ticks land slightly after each whole second; truncating would
/// render one second too low.
fn rounded_seconds(remaining: Duration) -> i64 {
    (remaining.num_milliseconds() + 500).div_euclid(1000)
}

/// Pending OS shutdown plus the text the status label shows for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShutdownSchedule {
    phase: SchedulePhase,
    target_time: Option<DateTime<Utc>>,
    status_text: String,
}

impl ShutdownSchedule {
    /// Create an idle schedule
    pub fn new() -> Self {
        Self {
            phase: SchedulePhase::Idle,
            target_time: None,
            status_text: String::new(),
        }
    }

    pub fn phase(&self) -> SchedulePhase {
        self.phase
    }

    pub fn target_time(&self) -> Option<DateTime<Utc>> {
        self.target_time
    }

    /// Text of the status label
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Whether the one-second display timer should be running
    pub fn countdown_active(&self) -> bool {
        self.phase == SchedulePhase::Scheduled
    }

    /// Whether a shutdown has been requested and not cancelled
    pub fn is_pending(&self) -> bool {
        self.phase != SchedulePhase::Idle
    }

    /// Check an hour/minute offset and convert it to seconds
    pub fn validate_offset(hours: u32, minutes: u32) -> Result<u64, ControlError> {
        if hours > MAX_HOURS || minutes > MAX_MINUTES {
            return Err(ControlError::OffsetOutOfRange { hours, minutes });
        }
        if hours == 0 && minutes == 0 {
            return Err(ControlError::ZeroOffset);
        }
        Ok(u64::from(hours) * 3600 + u64::from(minutes) * 60)
    }

    /// Request an OS shutdown `hours`/`minutes` from `now` and start the countdown
    pub fn schedule(
        &mut self,
        hours: u32,
        minutes: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<Effect>, ControlError> {
        if self.is_pending() {
            return Err(ControlError::ShutdownPending);
        }
        let delay_seconds = match Self::validate_offset(hours, minutes) {
            Ok(delay) => delay,
            Err(e) => {
                warn!("Rejected shutdown schedule: {}", e);
                return Err(e);
            }
        };

        let target = now + Duration::seconds(delay_seconds as i64);
        self.phase = SchedulePhase::Scheduled;
        self.target_time = Some(target);
        info!("Shutdown scheduled in {}s, at {}", delay_seconds, target);

        let mut effects = vec![Effect::ScheduleShutdown { delay_seconds }];
        effects.extend(self.tick(now));
        Ok(effects)
    }

    /// Seconds left until the target, rounded; negative once passed
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> Option<i64> {
        self.target_time.map(|target| rounded_seconds(target - now))
    }

    /// Refresh the countdown text. Fires once the target is reached.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        if self.phase != SchedulePhase::Scheduled {
            return Vec::new();
        }
        let Some(target) = self.target_time else {
            return Vec::new();
        };

        let remaining = target - now;
        if remaining <= Duration::zero() {
            info!("Shutdown countdown reached zero");
            self.phase = SchedulePhase::Fired;
            self.status_text = SHUTTING_DOWN_TEXT.to_string();
            return Vec::new();
        }

        let countdown = format_countdown(rounded_seconds(remaining) as u64);
        debug!("Shutdown countdown at {}", countdown);
        self.status_text = format!("Shutdown in {}", countdown);
        Vec::new()
    }

    /// Abort the OS shutdown and return to idle
    pub fn cancel(&mut self) -> Result<Vec<Effect>, ControlError> {
        if !self.is_pending() {
            return Err(ControlError::NoShutdownScheduled);
        }

        self.phase = SchedulePhase::Idle;
        self.target_time = None;
        self.status_text = CANCELLED_TEXT.to_string();
        info!("Shutdown cancelled");

        Ok(vec![
            Effect::AbortShutdown,
            Effect::Notify(Notice::info(CANCELLED_TEXT)),
        ])
    }
}

impl Default for ShutdownSchedule {
    fn default() -> Self {
        Self::new()
    }
}

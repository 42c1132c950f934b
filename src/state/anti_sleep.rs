//! Anti-sleep session state and transitions

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::effect::{Effect, Notice};
use crate::error::ControlError;

/// Shortest allowed click interval in seconds
pub const MIN_INTERVAL_SECS: u64 = 10;
/// Longest allowed click interval in seconds
pub const MAX_INTERVAL_SECS: u64 = 3600;

/// Pointer position that halts the session when seen on a tick.
///
/// Parking the cursor in the top-left corner is the user's way to stop
/// clicking without reaching the controls. A real pointer can land there by
/// accident too; the behavior is kept as is.
pub const HALT_POSITION: (i32, i32) = (0, 0);

/// Periodic clicking session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntiSleepSession {
    /// Seconds between clicks; last value used to start, or the default
    pub interval_seconds: u64,
    pub active: bool,
}

impl AntiSleepSession {
    /// Create an inactive session that will use `default_interval` when started
    /// without an explicit interval
    pub fn new(default_interval: u64) -> Self {
        Self {
            interval_seconds: default_interval,
            active: false,
        }
    }

    /// Check that an interval lies in the accepted range
    pub fn validate_interval(interval_seconds: u64) -> Result<u64, ControlError> {
        if (MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&interval_seconds) {
            Ok(interval_seconds)
        } else {
            Err(ControlError::IntervalOutOfRange(interval_seconds))
        }
    }

    /// Begin clicking every `interval_seconds`
    pub fn start(&mut self, interval_seconds: u64) -> Result<Vec<Effect>, ControlError> {
        if self.active {
            return Err(ControlError::AntiSleepActive);
        }
        let interval_seconds = Self::validate_interval(interval_seconds)?;

        self.interval_seconds = interval_seconds;
        self.active = true;
        info!("Anti-sleep started with a {}s interval", interval_seconds);

        Ok(vec![Effect::Notify(Notice::info(format!(
            "Anti-sleep started: clicking every {} seconds",
            interval_seconds
        )))])
    }

    /// Handle one timer tick given the current pointer position
    pub fn tick(&mut self, pointer: (i32, i32)) -> Vec<Effect> {
        if !self.active {
            debug!("Ignoring click tick for an inactive session");
            return Vec::new();
        }

        if pointer == HALT_POSITION {
            info!("Pointer parked at the screen origin, stopping anti-sleep");
            return self.stop();
        }

        let (x, y) = pointer;
        debug!("Clicking in place at ({}, {})", x, y);
        vec![Effect::Click { x, y }]
    }

    /// Stop clicking. A no-op when the session is not running.
    pub fn stop(&mut self) -> Vec<Effect> {
        if !self.halt() {
            return Vec::new();
        }
        vec![Effect::Notify(Notice::info("Anti-sleep stopped"))]
    }

    /// Stop without a notice; returns whether the session was running
    pub fn halt(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        info!("Anti-sleep stopped");
        true
    }

    /// Period the click timer should run at, if it should run at all
    pub fn timer_period(&self) -> Option<Duration> {
        self.active.then(|| Duration::from_secs(self.interval_seconds))
    }
}

impl Default for AntiSleepSession {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_notice(effects: &[Effect]) -> bool {
        effects.iter().any(|e| matches!(e, Effect::Notify(_)))
    }

    #[test]
    fn start_activates_with_one_notice() {
        let mut session = AntiSleepSession::default();
        let effects = session.start(30).unwrap();

        assert!(session.active);
        assert_eq!(session.interval_seconds, 30);
        assert_eq!(effects.len(), 1);
        assert!(has_notice(&effects));
        assert_eq!(session.timer_period(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn start_rejects_out_of_range_intervals() {
        let mut session = AntiSleepSession::default();

        assert_eq!(session.start(9), Err(ControlError::IntervalOutOfRange(9)));
        assert_eq!(session.start(3601), Err(ControlError::IntervalOutOfRange(3601)));
        assert!(!session.active);
        assert_eq!(session.interval_seconds, 60);
    }

    #[test]
    fn start_accepts_range_bounds() {
        for interval in [MIN_INTERVAL_SECS, MAX_INTERVAL_SECS] {
            let mut session = AntiSleepSession::default();
            assert!(session.start(interval).is_ok());
        }
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut session = AntiSleepSession::default();
        session.start(60).unwrap();

        assert_eq!(session.start(120), Err(ControlError::AntiSleepActive));
        assert_eq!(session.interval_seconds, 60);
    }

    #[test]
    fn start_then_stop_restores_inactive_state() {
        for interval in [10, 11, 60, 599, 3600] {
            let mut session = AntiSleepSession::new(interval);
            let before = session.clone();

            session.start(interval).unwrap();
            let effects = session.stop();

            assert_eq!(session, before);
            assert!(has_notice(&effects));
            assert_eq!(session.timer_period(), None);
        }
    }

    #[test]
    fn tick_clicks_at_pointer_without_moving() {
        let mut session = AntiSleepSession::default();
        session.start(60).unwrap();

        let effects = session.tick((640, 360));
        assert_eq!(effects, vec![Effect::Click { x: 640, y: 360 }]);
        assert!(session.active);
    }

    #[test]
    fn tick_at_origin_stops_and_suppresses_click() {
        let mut session = AntiSleepSession::default();
        session.start(60).unwrap();

        let effects = session.tick((0, 0));
        assert!(!session.active);
        assert!(effects.iter().all(|e| !matches!(e, Effect::Click { .. })));
        assert!(has_notice(&effects));
    }

    #[test]
    fn origin_check_needs_both_axes() {
        let mut session = AntiSleepSession::default();
        session.start(60).unwrap();

        assert_eq!(session.tick((0, 5)), vec![Effect::Click { x: 0, y: 5 }]);
        assert_eq!(session.tick((5, 0)), vec![Effect::Click { x: 5, y: 0 }]);
        assert!(session.active);
    }

    #[test]
    fn stop_when_inactive_is_silent() {
        let mut session = AntiSleepSession::default();
        assert!(session.stop().is_empty());
        assert!(!session.halt());
    }

    #[test]
    fn tick_when_inactive_does_nothing() {
        let mut session = AntiSleepSession::default();
        assert!(session.tick((100, 100)).is_empty());
    }
}

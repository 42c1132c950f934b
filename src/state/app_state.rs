//! Main application state management

use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::{
    effect::Effect,
    view::{AntiSleepView, Controls, ShutdownView, StatusView},
    AntiSleepSession, ShutdownSchedule,
};
use crate::error::ControlError;

/// Result of a close request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Nothing blocks the close; the event loop should exit
    Closed,
    /// A shutdown countdown is running and the caller has not confirmed
    ConfirmationRequired,
}

/// Question asked before closing with a shutdown pending
pub const CLOSE_CONFIRMATION: &str =
    "A shutdown is still scheduled and closing will not cancel it. Close anyway?";

/// Errors kept for the status view
pub const MAX_ERRORS: usize = 20;

/// Offsets and interval used when a request leaves them out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Defaults {
    pub interval_seconds: u64,
    pub hours: u32,
    pub minutes: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            interval_seconds: 60,
            hours: 1,
            minutes: 0,
        }
    }
}

/// Owner of both controllers and the bookkeeping around them.
///
/// Only the event loop holds one of these, so there is no locking.
#[derive(Debug)]
pub struct AppState {
    pub anti_sleep: AntiSleepSession,
    pub shutdown: ShutdownSchedule,
    pub defaults: Defaults,
    /// OS call failures, for client visibility
    pub errors: Vec<String>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

impl AppState {
    /// Create a new AppState with both controllers idle
    pub fn new(port: u16, host: String, defaults: Defaults) -> Self {
        Self {
            anti_sleep: AntiSleepSession::new(defaults.interval_seconds),
            shutdown: ShutdownSchedule::new(),
            defaults,
            errors: Vec::new(),
            start_time: Instant::now(),
            port,
            host,
            last_action: None,
            last_action_time: None,
        }
    }

    fn record_action(&mut self, action: &str, now: DateTime<Utc>) {
        self.last_action = Some(action.to_string());
        self.last_action_time = Some(now);
    }

    /// Start anti-sleep, falling back to the configured interval
    pub fn start_anti_sleep(
        &mut self,
        interval_seconds: Option<u64>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Effect>, ControlError> {
        let interval = interval_seconds.unwrap_or(self.defaults.interval_seconds);
        let effects = self.anti_sleep.start(interval)?;
        self.clear_errors_for("click");
        self.record_action("anti-sleep-start", now);
        Ok(effects)
    }

    /// Stop anti-sleep; idempotent
    pub fn stop_anti_sleep(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        let effects = self.anti_sleep.stop();
        if !effects.is_empty() {
            self.record_action("anti-sleep-stop", now);
        }
        effects
    }

    /// Click timer fired with the pointer at `pointer`
    pub fn anti_sleep_tick(&mut self, pointer: (i32, i32), now: DateTime<Utc>) -> Vec<Effect> {
        let was_active = self.anti_sleep.active;
        let effects = self.anti_sleep.tick(pointer);
        if was_active && !self.anti_sleep.active {
            self.record_action("anti-sleep-auto-stop", now);
        }
        effects
    }

    /// Schedule a shutdown, falling back to the configured offset for missing fields
    pub fn schedule_shutdown(
        &mut self,
        hours: Option<u32>,
        minutes: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Effect>, ControlError> {
        let hours = hours.unwrap_or(self.defaults.hours);
        let minutes = minutes.unwrap_or(self.defaults.minutes);
        let effects = self.shutdown.schedule(hours, minutes, now)?;
        self.clear_errors_for("shutdown");
        self.record_action("shutdown-schedule", now);
        Ok(effects)
    }

    /// Countdown timer fired
    pub fn shutdown_tick(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        self.shutdown.tick(now)
    }

    /// Cancel the pending shutdown
    pub fn cancel_shutdown(&mut self, now: DateTime<Utc>) -> Result<Vec<Effect>, ControlError> {
        let effects = self.shutdown.cancel()?;
        self.clear_errors_for("shutdown");
        self.record_action("shutdown-cancel", now);
        Ok(effects)
    }

    /// Handle a request to close the host.
    ///
    /// Refuses without `confirmed` while the countdown runs. On close the
    /// anti-sleep session is halted silently and the OS schedule is left alone.
    pub fn request_close(&mut self, confirmed: bool, now: DateTime<Utc>) -> CloseOutcome {
        if self.shutdown.countdown_active() && !confirmed {
            warn!("Close requested with a shutdown pending, awaiting confirmation");
            return CloseOutcome::ConfirmationRequired;
        }

        if self.anti_sleep.halt() {
            info!("Anti-sleep halted for close");
        }
        if self.shutdown.countdown_active() {
            info!("Closing with a shutdown still scheduled; the OS will carry it out");
        }
        self.record_action("close", now);
        CloseOutcome::Closed
    }

    /// Add an error to the state, dropping the oldest past `MAX_ERRORS`
    pub fn add_error(&mut self, error: String) {
        warn!("Adding error to state: {}", error);
        self.errors.push(error);
        if self.errors.len() > MAX_ERRORS {
            self.errors.remove(0);
        }
    }

    /// Clear errors mentioning a specific component
    pub fn clear_errors_for(&mut self, component: &str) {
        let initial_count = self.errors.len();
        let component = component.to_lowercase();
        self.errors
            .retain(|error| !error.to_lowercase().contains(&component));

        if self.errors.len() != initial_count {
            info!(
                "Cleared {} errors for component: {}",
                initial_count - self.errors.len(),
                component
            );
        }
    }

    /// Which controls are usable right now
    pub fn controls(&self) -> Controls {
        let anti_sleep = self.anti_sleep.active;
        let pending = self.shutdown.is_pending();
        Controls {
            start_anti_sleep: !anti_sleep,
            stop_anti_sleep: anti_sleep,
            schedule_shutdown: !pending,
            offset_inputs: !pending,
            cancel_shutdown: pending,
        }
    }

    /// Render the full snapshot the host surface displays
    pub fn view(&self, now: DateTime<Utc>) -> StatusView {
        let remaining_seconds = if self.shutdown.countdown_active() {
            self.shutdown
                .remaining_seconds(now)
                .map(|remaining| remaining.max(0) as u64)
        } else {
            None
        };

        StatusView {
            controls: self.controls(),
            status_text: self.shutdown.status_text().to_string(),
            anti_sleep: AntiSleepView {
                active: self.anti_sleep.active,
                interval_seconds: self.anti_sleep.interval_seconds,
            },
            shutdown: ShutdownView {
                phase: self.shutdown.phase(),
                target_time: self.shutdown.target_time(),
                remaining_seconds,
                hours: self.defaults.hours,
                minutes: self.defaults.minutes,
            },
            errors: self.errors.clone(),
            uptime: self.get_uptime(),
            port: self.port,
            host: self.host.clone(),
            last_action: self.last_action.clone(),
            last_action_time: self.last_action_time,
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SchedulePhase;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 20, 0, 0).unwrap()
    }

    fn state() -> AppState {
        AppState::new(20554, "127.0.0.1".to_string(), Defaults::default())
    }

    #[test]
    fn fresh_state_enables_start_and_schedule_only() {
        let controls = state().controls();
        assert!(controls.start_anti_sleep);
        assert!(!controls.stop_anti_sleep);
        assert!(controls.schedule_shutdown);
        assert!(controls.offset_inputs);
        assert!(!controls.cancel_shutdown);
    }

    #[test]
    fn anti_sleep_start_stop_restores_controls() {
        let mut state = state();
        let before = state.controls();

        state.start_anti_sleep(Some(45), t0()).unwrap();
        assert!(state.controls().stop_anti_sleep);
        state.stop_anti_sleep(t0());

        assert_eq!(state.controls(), before);
        assert_eq!(state.last_action.as_deref(), Some("anti-sleep-stop"));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let mut state = state();
        state.start_anti_sleep(None, t0()).unwrap();
        assert_eq!(state.anti_sleep.interval_seconds, 60);

        state.schedule_shutdown(None, Some(15), t0()).unwrap();
        assert_eq!(state.shutdown.target_time(), Some(t0() + Duration::seconds(4500)));
    }

    #[test]
    fn schedule_then_cancel_restores_controls() {
        let mut state = state();
        let before = state.controls();

        state.schedule_shutdown(Some(1), Some(30), t0()).unwrap();
        let locked = state.controls();
        assert!(!locked.schedule_shutdown);
        assert!(!locked.offset_inputs);
        assert!(locked.cancel_shutdown);

        state.cancel_shutdown(t0() + Duration::seconds(42)).unwrap();
        assert_eq!(state.controls(), before);
        assert_eq!(state.shutdown.target_time(), None);
    }

    #[test]
    fn fired_schedule_keeps_cancel_enabled() {
        let mut state = state();
        state.schedule_shutdown(Some(0), Some(1), t0()).unwrap();
        state.shutdown_tick(t0() + Duration::seconds(61));

        assert_eq!(state.shutdown.phase(), SchedulePhase::Fired);
        assert!(state.controls().cancel_shutdown);
        assert!(state.cancel_shutdown(t0() + Duration::seconds(62)).is_ok());
    }

    #[test]
    fn declined_close_changes_nothing() {
        let mut state = state();
        state.start_anti_sleep(Some(30), t0()).unwrap();
        state.schedule_shutdown(Some(2), Some(0), t0()).unwrap();
        let before = state.view(t0());

        assert_eq!(
            state.request_close(false, t0()),
            CloseOutcome::ConfirmationRequired
        );
        let after = state.view(t0());
        assert_eq!(after.controls, before.controls);
        assert_eq!(after.status_text, before.status_text);
        assert_eq!(after.anti_sleep, before.anti_sleep);
        assert_eq!(after.shutdown, before.shutdown);
        assert!(state.anti_sleep.timer_period().is_some());
        assert!(state.shutdown.countdown_active());
    }

    #[test]
    fn confirmed_close_halts_anti_sleep_but_keeps_schedule() {
        let mut state = state();
        state.start_anti_sleep(Some(30), t0()).unwrap();
        state.schedule_shutdown(Some(2), Some(0), t0()).unwrap();

        assert_eq!(state.request_close(true, t0()), CloseOutcome::Closed);
        assert!(!state.anti_sleep.active);
        assert_eq!(state.shutdown.phase(), SchedulePhase::Scheduled);
        assert!(state.shutdown.target_time().is_some());
    }

    #[test]
    fn close_without_countdown_needs_no_confirmation() {
        let mut state = state();
        state.start_anti_sleep(Some(30), t0()).unwrap();

        assert_eq!(state.request_close(false, t0()), CloseOutcome::Closed);
        assert!(!state.anti_sleep.active);
    }

    #[test]
    fn errors_are_cleared_per_component() {
        let mut state = state();
        state.add_error("Click injection failed: no display".to_string());
        state.add_error("Shutdown scheduling failed: not permitted".to_string());

        state.schedule_shutdown(Some(1), Some(0), t0()).unwrap();
        assert_eq!(state.errors, vec!["Click injection failed: no display".to_string()]);

        state.start_anti_sleep(None, t0()).unwrap();
        assert!(state.errors.is_empty());
    }

    #[test]
    fn view_reports_remaining_only_while_counting_down() {
        let mut state = state();
        assert_eq!(state.view(t0()).shutdown.remaining_seconds, None);

        state.schedule_shutdown(Some(0), Some(10), t0()).unwrap();
        let view = state.view(t0() + Duration::seconds(100));
        assert_eq!(view.shutdown.remaining_seconds, Some(500));
        assert_eq!(view.status_text, "Shutdown in 00:10:00");
    }
}

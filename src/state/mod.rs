//! State management module
//!
//! This module contains the two controllers, the effects their transitions
//! produce, and the snapshot the host surface renders from them.

pub mod anti_sleep;
pub mod app_state;
pub mod effect;
pub mod shutdown_schedule;
pub mod view;

// Re-export main types
pub use anti_sleep::AntiSleepSession;
pub use app_state::{AppState, CloseOutcome, Defaults, CLOSE_CONFIRMATION};
pub use effect::{Effect, Notice, NoticeLevel};
pub use shutdown_schedule::{format_countdown, SchedulePhase, ShutdownSchedule};
pub use view::{Controls, StatusView};

//! Nightcap - A state-managed control server for anti-sleep clicking and delayed shutdown
//!
//! This library provides two independent controllers: one that keeps the
//! machine awake by clicking in place on an interval, and one that schedules
//! an OS-level shutdown and tracks its countdown.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::ControlError;
pub use state::AppState;
pub use api::create_router;
pub use tasks::{run_event_loop, ControlHandle};
pub use utils::signals::close_on_signal;

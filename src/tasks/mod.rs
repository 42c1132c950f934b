//! Background tasks module
//!
//! This module contains the event loop that drives both controllers and the
//! handle other tasks use to talk to it.

pub mod event_loop;
pub mod handle;

// Re-export main types
pub use event_loop::{apply_effects, run_event_loop};
pub use handle::{CloseReply, Command, ControlHandle, Reply};

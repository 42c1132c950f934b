//! OS-facing services module
//!
//! This module contains the gateway trait the controllers talk through and
//! its implementations for the real system and for dry runs.

pub mod dry_run;
pub mod gateway;
pub mod system;

// Re-export main types
pub use dry_run::DryRunGateway;
pub use gateway::OsGateway;
pub use system::{ShutdownCommand, SystemGateway};

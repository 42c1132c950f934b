//! Gateway that reads the pointer but only logs clicks and shutdown commands

use tracing::info;

use super::{
    gateway::OsGateway,
    system::{query_pointer, ShutdownCommand},
};

/// Side-effect free gateway for trying the controls out
#[derive(Debug, Default)]
pub struct DryRunGateway;

impl DryRunGateway {
    pub fn new() -> Self {
        Self
    }
}

impl OsGateway for DryRunGateway {
    fn pointer_position(&mut self) -> Result<(i32, i32), String> {
        query_pointer()
    }

    fn click(&mut self, x: i32, y: i32) -> Result<(), String> {
        info!("[dry-run] would click at ({}, {})", x, y);
        Ok(())
    }

    fn schedule_shutdown(&mut self, delay_seconds: u64) -> Result<(), String> {
        info!("[dry-run] would run: {}", ShutdownCommand::schedule(delay_seconds));
        Ok(())
    }

    fn abort_shutdown(&mut self) -> Result<(), String> {
        info!("[dry-run] would run: {}", ShutdownCommand::abort());
        Ok(())
    }
}

//! System operations: pointer query, synthetic clicks and shutdown commands

use std::{fmt, process::Stdio};

use enigo::{Button, Direction, Enigo, Mouse, Settings};
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::gateway::OsGateway;

/// Hide the console window of spawned commands
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// A platform shutdown command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShutdownCommand {
    pub program: &'static str,
    pub args: Vec<String>,
}

impl fmt::Display for ShutdownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

impl ShutdownCommand {
    /// Command that powers the machine off after `delay_seconds`.
    ///
    /// Unix `shutdown` only takes whole minutes, so the delay is rounded up.
    pub fn schedule(delay_seconds: u64) -> Self {
        if cfg!(windows) {
            Self {
                program: "shutdown",
                args: vec!["/s".into(), "/t".into(), delay_seconds.to_string()],
            }
        } else {
            Self {
                program: "shutdown",
                args: vec!["-h".into(), format!("+{}", delay_seconds.div_ceil(60))],
            }
        }
    }

    /// Command that aborts a pending shutdown
    pub fn abort() -> Self {
        if cfg!(windows) {
            Self {
                program: "shutdown",
                args: vec!["/a".into()],
            }
        } else {
            Self {
                program: "shutdown",
                args: vec!["-c".into()],
            }
        }
    }

    /// Spawn the command without a window or captured output.
    ///
    /// Only a failure to launch is returned; the exit status is logged from a
    /// background task. Must be called inside a tokio runtime.
    pub fn spawn_detached(&self) -> Result<(), String> {
        let mut command = Command::new(self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        let mut child = command
            .spawn()
            .map_err(|e| format!("Failed to execute {}: {}", self, e))?;

        let line = self.to_string();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => debug!("{} completed", line),
                Ok(status) => warn!("{} exited with {}", line, status),
                Err(e) => warn!("Failed to wait for {}: {}", line, e),
            }
        });
        Ok(())
    }
}

fn connect() -> Result<Enigo, String> {
    Enigo::new(&Settings::default())
        .map_err(|e| format!("Failed to connect to the input system: {}", e))
}

/// Read the pointer position from the windowing system
pub fn query_pointer() -> Result<(i32, i32), String> {
    connect()?
        .location()
        .map_err(|e| format!("Failed to query pointer position: {}", e))
}

/// Gateway backed by the real input system and shutdown command
#[derive(Debug, Default)]
pub struct SystemGateway;

impl SystemGateway {
    pub fn new() -> Self {
        Self
    }

    /// Check that the input system is reachable, so a missing display shows
    /// up at startup rather than on the first tick
    pub fn probe(&self) -> Result<(), String> {
        let (x, y) = query_pointer()?;
        info!("Input system available, pointer at ({}, {})", x, y);
        Ok(())
    }
}

impl OsGateway for SystemGateway {
    fn pointer_position(&mut self) -> Result<(i32, i32), String> {
        query_pointer()
    }

    fn click(&mut self, x: i32, y: i32) -> Result<(), String> {
        let mut enigo = connect()?;
        enigo
            .button(Button::Left, Direction::Press)
            .map_err(|e| format!("Click press failed at ({}, {}): {}", x, y, e))?;
        enigo
            .button(Button::Left, Direction::Release)
            .map_err(|e| format!("Click release failed at ({}, {}): {}", x, y, e))?;
        debug!("Clicked at ({}, {})", x, y);
        Ok(())
    }

    fn schedule_shutdown(&mut self, delay_seconds: u64) -> Result<(), String> {
        let command = ShutdownCommand::schedule(delay_seconds);
        info!("Executing {}", command);
        command.spawn_detached()
    }

    fn abort_shutdown(&mut self) -> Result<(), String> {
        let command = ShutdownCommand::abort();
        info!("Executing {}", command);
        command.spawn_detached()
    }
}

//! Signal handling: termination signals act as close requests

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::{state::CloseOutcome, tasks::ControlHandle};

/// Tracks which scheduled shutdown the user has already been warned about.
///
/// A signal refused because of a pending shutdown arms the next signal, but
/// only for that same schedule: cancelling and scheduling again asks anew.
#[derive(Debug, Default)]
pub struct CloseConfirmation {
    warned_for: Option<DateTime<Utc>>,
}

impl CloseConfirmation {
    pub fn new() -> Self {
        Self::default()
    }

    async fn confirmed(&self, handle: &ControlHandle) -> bool {
        let Some(warned_for) = self.warned_for else {
            return false;
        };
        match handle.status().await {
            Ok(view) => view.shutdown.target_time == Some(warned_for),
            Err(_) => false,
        }
    }

    /// Send a close request for one received signal.
    ///
    /// Returns true once the event loop has accepted the close or is gone.
    pub async fn forward(&mut self, handle: &ControlHandle) -> bool {
        let confirmed = self.confirmed(handle).await;
        match handle.close(confirmed).await {
            Ok(reply) => match reply.outcome {
                CloseOutcome::Closed => true,
                CloseOutcome::ConfirmationRequired => {
                    warn!(
                        "A shutdown is still scheduled and closing will not cancel it; \
                         send the signal again to close anyway"
                    );
                    self.warned_for = reply.view.shutdown.target_time;
                    false
                }
            },
            Err(e) => {
                info!("Event loop already stopped: {}", e);
                true
            }
        }
    }
}

/// Turn SIGTERM/SIGINT into close requests until one is accepted
#[cfg(unix)]
pub async fn close_on_signal(handle: ControlHandle) {
    use futures::stream::StreamExt;
    use signal_hook_tokio::Signals;

    let mut signals = match Signals::new([
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ]) {
        Ok(signals) => signals,
        Err(e) => {
            error!("Failed to create signal handler: {}", e);
            return;
        }
    };

    let mut confirmation = CloseConfirmation::new();
    while let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
        if confirmation.forward(&handle).await {
            break;
        }
    }
}

/// Turn Ctrl-C into close requests until one is accepted
#[cfg(not(unix))]
pub async fn close_on_signal(handle: ControlHandle) {
    let mut confirmation = CloseConfirmation::new();
    loop {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            return;
        }
        info!("Received Ctrl-C");
        if confirmation.forward(&handle).await {
            break;
        }
    }
}

//! Commands sent to the event loop and the handle that sends them

use tokio::sync::{mpsc, oneshot};

use crate::{
    error::ControlError,
    state::{CloseOutcome, Notice, StatusView},
};

/// Answer to a control action
#[derive(Debug, Clone)]
pub struct Reply {
    /// Notices produced by the action, or why it was refused
    pub result: Result<Vec<Notice>, ControlError>,
    /// Snapshot rendered after the action
    pub view: StatusView,
}

/// Answer to a close request
#[derive(Debug, Clone)]
pub struct CloseReply {
    pub outcome: CloseOutcome,
    pub view: StatusView,
}

/// A request for the event loop
#[derive(Debug)]
pub enum Command {
    StartAntiSleep {
        interval_seconds: Option<u64>,
        reply: oneshot::Sender<Reply>,
    },
    StopAntiSleep {
        reply: oneshot::Sender<Reply>,
    },
    ScheduleShutdown {
        hours: Option<u32>,
        minutes: Option<u32>,
        reply: oneshot::Sender<Reply>,
    },
    CancelShutdown {
        reply: oneshot::Sender<Reply>,
    },
    Close {
        confirmed: bool,
        reply: oneshot::Sender<CloseReply>,
    },
    Status {
        reply: oneshot::Sender<StatusView>,
    },
}

/// Cloneable sender side of the event loop
#[derive(Debug, Clone)]
pub struct ControlHandle {
    tx: mpsc::Sender<Command>,
}

impl ControlHandle {
    /// Create a handle and the receiver `run_event_loop` consumes
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Command>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, String> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .await
            .map_err(|_| "Event loop is not running".to_string())?;
        reply_rx
            .await
            .map_err(|_| "Event loop dropped the request".to_string())
    }

    pub async fn start_anti_sleep(&self, interval_seconds: Option<u64>) -> Result<Reply, String> {
        self.request(|reply| Command::StartAntiSleep {
            interval_seconds,
            reply,
        })
        .await
    }

    pub async fn stop_anti_sleep(&self) -> Result<Reply, String> {
        self.request(|reply| Command::StopAntiSleep { reply }).await
    }

    pub async fn schedule_shutdown(
        &self,
        hours: Option<u32>,
        minutes: Option<u32>,
    ) -> Result<Reply, String> {
        self.request(|reply| Command::ScheduleShutdown {
            hours,
            minutes,
            reply,
        })
        .await
    }

    pub async fn cancel_shutdown(&self) -> Result<Reply, String> {
        self.request(|reply| Command::CancelShutdown { reply }).await
    }

    pub async fn close(&self, confirmed: bool) -> Result<CloseReply, String> {
        self.request(|reply| Command::Close { confirmed, reply })
            .await
    }

    pub async fn status(&self) -> Result<StatusView, String> {
        self.request(|reply| Command::Status { reply }).await
    }
}

//! Shared test helpers: a gateway that records calls instead of touching the OS

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use nightcap::{
    services::OsGateway,
    state::{AppState, Defaults},
    tasks::{run_event_loop, ControlHandle},
};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Click(i32, i32),
    Schedule(u64),
    Abort,
}

#[derive(Debug)]
struct Recorded {
    pointer: (i32, i32),
    calls: Vec<Call>,
    fail_shutdown: bool,
}

/// Cloneable view onto what the event loop asked the OS to do
#[derive(Debug, Clone)]
pub struct RecordingGateway {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Recorded {
                pointer: (500, 400),
                calls: Vec::new(),
                fail_shutdown: false,
            })),
        }
    }

    pub fn set_pointer(&self, x: i32, y: i32) {
        self.inner.lock().unwrap().pointer = (x, y);
    }

    pub fn fail_shutdown_commands(&self) {
        self.inner.lock().unwrap().fail_shutdown = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clicks(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Click(..)))
            .count()
    }
}

impl OsGateway for RecordingGateway {
    fn pointer_position(&mut self) -> Result<(i32, i32), String> {
        Ok(self.inner.lock().unwrap().pointer)
    }

    fn click(&mut self, x: i32, y: i32) -> Result<(), String> {
        self.inner.lock().unwrap().calls.push(Call::Click(x, y));
        Ok(())
    }

    fn schedule_shutdown(&mut self, delay_seconds: u64) -> Result<(), String> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_shutdown {
            return Err("access denied".to_string());
        }
        inner.calls.push(Call::Schedule(delay_seconds));
        Ok(())
    }

    fn abort_shutdown(&mut self) -> Result<(), String> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_shutdown {
            return Err("access denied".to_string());
        }
        inner.calls.push(Call::Abort);
        Ok(())
    }
}

/// Spawn an event loop over a recording gateway with default settings
pub fn spawn_loop() -> (ControlHandle, RecordingGateway, JoinHandle<AppState>) {
    let gateway = RecordingGateway::new();
    let state = AppState::new(20554, "127.0.0.1".to_string(), Defaults::default());
    let (handle, commands) = ControlHandle::channel(8);
    let task = tokio::spawn(run_event_loop(state, gateway.clone(), commands));
    (handle, gateway, task)
}

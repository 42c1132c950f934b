//! The single event loop that owns all controller state

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::{
    sync::{mpsc, oneshot},
    time::{interval_at, Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use super::handle::{CloseReply, Command, Reply};
use crate::{
    services::OsGateway,
    state::{AppState, CloseOutcome, Effect, Notice, NoticeLevel},
};

const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// Wall clock anchored at loop start and advanced by the runtime clock
struct LoopClock {
    wall: DateTime<Utc>,
    started: Instant,
}

impl LoopClock {
    fn start() -> Self {
        Self {
            wall: Utc::now(),
            started: Instant::now(),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.started.elapsed())
            .unwrap_or_else(|_| chrono::Duration::zero());
        self.wall + elapsed
    }
}

fn new_interval(period: Duration) -> Interval {
    // First tick one period from now, like a freshly started UI timer.
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

/// The two timers, kept in step with controller state
#[derive(Default)]
struct Timers {
    click: Option<(Duration, Interval)>,
    countdown: Option<Interval>,
}

impl Timers {
    fn reconcile(&mut self, state: &AppState) {
        match state.anti_sleep.timer_period() {
            Some(period) => {
                if self.click.as_ref().map(|(p, _)| *p) != Some(period) {
                    debug!("Starting click timer every {:?}", period);
                    self.click = Some((period, new_interval(period)));
                }
            }
            None => {
                if self.click.take().is_some() {
                    debug!("Click timer stopped");
                }
            }
        }

        if state.shutdown.countdown_active() {
            if self.countdown.is_none() {
                debug!("Starting countdown timer");
                self.countdown = Some(new_interval(COUNTDOWN_PERIOD));
            }
        } else if self.countdown.take().is_some() {
            debug!("Countdown timer stopped");
        }
    }
}

async fn next_tick(timer: Option<&mut Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

fn respond<T>(reply: oneshot::Sender<T>, value: T) {
    if reply.send(value).is_err() {
        debug!("Requester went away before the reply");
    }
}

/// Execute effects against the gateway; returns the notices for the caller.
///
/// OS failures are recorded on the state and turned into warnings, never
/// retried.
pub fn apply_effects<G: OsGateway>(
    state: &mut AppState,
    gateway: &mut G,
    effects: Vec<Effect>,
) -> Vec<Notice> {
    let mut notices = Vec::new();

    for effect in effects {
        let failure = match effect {
            Effect::Click { x, y } => gateway
                .click(x, y)
                .err()
                .map(|e| format!("Click injection failed: {}", e)),
            Effect::ScheduleShutdown { delay_seconds } => gateway
                .schedule_shutdown(delay_seconds)
                .err()
                .map(|e| format!("Shutdown scheduling failed: {}", e)),
            Effect::AbortShutdown => gateway
                .abort_shutdown()
                .err()
                .map(|e| format!("Shutdown abort failed: {}", e)),
            Effect::Notify(notice) => {
                match notice.level {
                    NoticeLevel::Info => info!("Notice: {}", notice.message),
                    NoticeLevel::Warning => warn!("Notice: {}", notice.message),
                }
                notices.push(notice);
                None
            }
        };

        if let Some(message) = failure {
            state.add_error(message.clone());
            notices.push(Notice::warning(message));
        }
    }

    notices
}

fn handle_command<G: OsGateway>(
    state: &mut AppState,
    gateway: &mut G,
    command: Command,
    now: DateTime<Utc>,
) -> Flow {
    match command {
        Command::StartAntiSleep {
            interval_seconds,
            reply,
        } => {
            let result = state
                .start_anti_sleep(interval_seconds, now)
                .map(|effects| apply_effects(state, gateway, effects));
            respond(reply, Reply {
                result,
                view: state.view(now),
            });
        }
        Command::StopAntiSleep { reply } => {
            let effects = state.stop_anti_sleep(now);
            let notices = apply_effects(state, gateway, effects);
            respond(reply, Reply {
                result: Ok(notices),
                view: state.view(now),
            });
        }
        Command::ScheduleShutdown {
            hours,
            minutes,
            reply,
        } => {
            let result = state
                .schedule_shutdown(hours, minutes, now)
                .map(|effects| apply_effects(state, gateway, effects));
            respond(reply, Reply {
                result,
                view: state.view(now),
            });
        }
        Command::CancelShutdown { reply } => {
            let result = state
                .cancel_shutdown(now)
                .map(|effects| apply_effects(state, gateway, effects));
            respond(reply, Reply {
                result,
                view: state.view(now),
            });
        }
        Command::Close { confirmed, reply } => {
            let outcome = state.request_close(confirmed, now);
            respond(reply, CloseReply {
                outcome,
                view: state.view(now),
            });
            if outcome == CloseOutcome::Closed {
                return Flow::Exit;
            }
        }
        Command::Status { reply } => {
            respond(reply, state.view(now));
        }
    }
    Flow::Continue
}

fn click_tick<G: OsGateway>(state: &mut AppState, gateway: &mut G, now: DateTime<Utc>) {
    match gateway.pointer_position() {
        Ok(pointer) => {
            let effects = state.anti_sleep_tick(pointer, now);
            apply_effects(state, gateway, effects);
        }
        Err(e) => state.add_error(format!("Click skipped: {}", e)),
    }
}

/// Run both controllers until a close is accepted or every handle is dropped.
///
/// Commands and timer ticks are handled one at a time, each to completion,
/// and the timers are re-derived from state after every step.
pub async fn run_event_loop<G: OsGateway>(
    mut state: AppState,
    mut gateway: G,
    mut commands: mpsc::Receiver<Command>,
) -> AppState {
    info!("Starting control event loop");

    let clock = LoopClock::start();
    let mut timers = Timers::default();

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    info!("All control handles dropped, stopping event loop");
                    break;
                };
                if handle_command(&mut state, &mut gateway, command, clock.now()) == Flow::Exit {
                    info!("Close accepted");
                    break;
                }
            }
            _ = next_tick(timers.click.as_mut().map(|(_, timer)| timer)) => {
                click_tick(&mut state, &mut gateway, clock.now());
            }
            _ = next_tick(timers.countdown.as_mut()) => {
                let now = clock.now();
                let effects = state.shutdown_tick(now);
                apply_effects(&mut state, &mut gateway, effects);
            }
        }

        timers.reconcile(&state);
    }

    info!("Control event loop stopped");
    state
}

//! ``src/controller/event_loop.rs``
//! ============================================================================
//! # Event Loop: terminal input, background results and ticks
//!
//! Three sources feed the application: the crossterm event stream, results
//! of background intake tasks, and a periodic tick that expires
//! notifications. `next_action` waits on all three and turns whatever
//! arrives first into a single [`Action`].

use std::time::Duration;

use crossterm::event::EventStream;
use futures::StreamExt;
use stagr::IntakeSource;
use tokio::{
    sync::mpsc,
    time::{Interval, MissedTickBehavior},
};
use tracing::{debug, info, trace, warn};

use crate::{
    controller::{actions::Action, event_processor},
    fs::intake::ReadOutcome,
    model::app_state::AppState,
};

/// Tick period for notification expiry.
const TICK_RATE: Duration = Duration::from_millis(250);

/// Results sent back by background tasks.
#[derive(Debug)]
pub enum TaskResult {
    /// Files read from disk for the staging area. `generation` is that of
    /// the form the intake was started from.
    FilesRead {
        generation: u64,
        source: IntakeSource,
        outcome: ReadOutcome,
    },
}

pub struct EventLoop {
    task_rx: mpsc::UnboundedReceiver<TaskResult>,
    event_stream: EventStream,
    tick: Interval,
}

impl EventLoop {
    pub fn new(task_rx: mpsc::UnboundedReceiver<TaskResult>) -> Self {
        info!("Initializing event loop");

        let mut tick = tokio::time::interval(TICK_RATE);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Self {
            task_rx,
            event_stream: EventStream::new(),
            tick,
        }
    }

    /// Wait for the next event and map it against the current state.
    ///
    /// Returns `None` once the terminal stream and the task channel are both
    /// closed.
    pub async fn next_action(&mut self, app: &AppState) -> Option<Action> {
        tokio::select! {
            maybe_event = self.event_stream.next() => match maybe_event {
                Some(Ok(event)) => {
                    trace!("Terminal event received: {:?}", event);
                    let action = event_processor::map_event(app, event);
                    debug!("Terminal event mapped to action: {:?}", action);
                    Some(action)
                }
                Some(Err(e)) => {
                    warn!("Terminal event error: {e}");
                    Some(Action::NoOp)
                }
                None => {
                    info!("Terminal event stream closed");
                    None
                }
            },

            Some(task_result) = self.task_rx.recv() => {
                debug!("Task result received: {:?}", task_result);
                Some(Action::TaskResult(task_result))
            }

            _ = self.tick.tick() => Some(Action::Tick),
        }
    }
}

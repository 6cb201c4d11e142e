//! Turn scheduler - the cancellable per-turn countdown
//!
//! Each armed turn spawns one sleep task that does nothing but send an
//! expiry message back to the owning runtime; the task never touches
//! game state. Cancelling aborts the task, and every expiry carries the
//! generation of the arm that created it, so a message from an already
//! cancelled or superseded turn is discarded even if it was in flight
//! when the abort landed. At most one expiry is ever acknowledged per
//! armed period.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Scheduler lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No countdown armed
    Idle,
    /// Counting down; waiting for a placement or the deadline
    Armed,
    /// The deadline passed and was acknowledged
    Fired,
    /// Match over; arming is refused
    Ended,
}

/// A countdown deadline that was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    generation: u64,
}

impl Expiry {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub struct TurnScheduler {
    tx: mpsc::UnboundedSender<Expiry>,
    pending: Option<JoinHandle<()>>,
    generation: u64,
    state: SchedulerState,
}

impl TurnScheduler {
    /// Create a scheduler and the channel its expiries arrive on
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Expiry>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                pending: None,
                generation: 0,
                state: SchedulerState::Idle,
            },
            rx,
        )
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Arm a fresh countdown, cancelling any previous one. Ignored once
    /// the scheduler has ended.
    pub fn arm(&mut self, delay: Duration) {
        if self.state == SchedulerState::Ended {
            return;
        }
        self.abort_pending();
        self.generation += 1;
        let generation = self.generation;
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Expiry { generation });
        }));
        self.state = SchedulerState::Armed;
    }

    /// Cancel the armed countdown without ending the scheduler
    pub fn cancel(&mut self) {
        if self.state == SchedulerState::Ended {
            return;
        }
        self.abort_pending();
        self.state = SchedulerState::Idle;
    }

    /// Accept or discard a received expiry. Returns true only for the
    /// expiry of the currently armed turn; anything stale is dropped.
    pub fn acknowledge(&mut self, expiry: &Expiry) -> bool {
        if self.state == SchedulerState::Armed && expiry.generation == self.generation {
            self.state = SchedulerState::Fired;
            true
        } else {
            false
        }
    }

    /// Terminal stop: cancel the countdown and refuse any further arming
    pub fn end(&mut self) {
        self.abort_pending();
        self.state = SchedulerState::Ended;
    }

    fn abort_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

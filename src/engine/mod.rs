//! Engine module - async orchestration of a match
//!
//! The scheduler runs the per-turn countdown on its own task; the
//! runtime funnels every mutation of the game through one owning task.

pub mod runtime;
pub mod scheduler;

pub use runtime::{Command, EngineHandle, GameRuntime};
pub use scheduler::{Expiry, SchedulerState, TurnScheduler};

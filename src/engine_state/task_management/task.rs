//! # Task System Core Traits
//!
//! This module defines the long-lived loop tasks run by a `WorkerPool`.
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and published once at startup via `WorkerPool::publish_task()`
//! 2. The pool hands it to an idle worker thread, which owns it from then on
//! 3. The worker calls `process()` repeatedly:
//!    - after `TaskStatus::Busy` it calls again straight away
//!    - after `TaskStatus::Idle` it sleeps until woken, the poll interval
//!      elapses, or the pool shuts down
//! 4. On shutdown the worker stops calling `process()` at the next poll
//!    boundary and drops the task
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred to its worker
//! - Everything a task shares with other threads lives behind its own lock

use std::time::Duration;

use crossbeam_channel::Receiver;

/// What a task reports after one iteration of its loop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    /// Work was done and more may be waiting; poll again immediately.
    Busy,
    /// Nothing to do; wait for a wake-up or the next poll interval.
    Idle,
}

/// A long-lived unit of background work.
///
/// # Implementation Guidelines
/// - `process()` must return in bounded time; it is the only place the worker
///   can observe shutdown
/// - Never hold a store or queue lock across a `process()` return
pub trait Task: Send {
    /// Name used in log messages.
    fn name(&self) -> &'static str;

    /// Runs one iteration of the task's loop.
    fn process(&mut self) -> TaskStatus;

    /// Fallback timer between idle polls.
    fn poll_interval(&self) -> Duration;

    /// Channel that wakes the task early when new work arrives.
    ///
    /// Tasks that only run on a timer return `None`.
    fn wake_receiver(&self) -> Option<Receiver<()>> {
        None
    }
}

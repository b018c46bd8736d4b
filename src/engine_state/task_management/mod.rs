//! # Task Management System
//!
//! This module runs the streaming pipeline's long-lived background loops on
//! fixed-size pools of OS threads.
//!
//! ## Architecture Overview
//!
//! - `WorkerPool`: a named pool of worker threads, each fed through its own channel
//! - `Task`: a long-lived loop that a worker owns until shutdown
//! - `WorkQueue`: a locked deque of pending work that wakes its consumer on push
//! - `ShutdownSignal` / `ShutdownListener`: the cancellation token threaded
//!   through every loop
//!
//! ## Task Lifecycle
//! 1. Tasks are published once via `WorkerPool::publish_task()`
//! 2. The pool assigns each task to the next idle worker, round-robin
//! 3. The worker drives the task until the shutdown signal fires
//! 4. `WorkerPool::join()` closes the task channels and waits for every worker
//!
//! ## Waiting
//! An idle task blocks in `crossbeam_channel::select!` on three sources:
//! the shutdown channel, the task's wake channel (if any) and a timeout equal to
//! its poll interval. A push to a queue therefore wakes its consumer at once,
//! while the timer keeps the periodic refill and eviction guarantees.
//!
//! ## Example Usage
//! ```rust,ignore
//! let mut signal = ShutdownSignal::new();
//! let mut pool = WorkerPool::new("data", 2, signal.listener());
//! pool.publish_task(Box::new(MyTask::new()));
//!
//! // ...
//!
//! signal.trigger();
//! pool.join();
//! ```

pub mod shutdown;
pub mod task;
pub mod work_queue;

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Sender};
use std::thread::{self, JoinHandle};

use crossbeam_channel::select;
use log::{debug, info, warn};

pub use shutdown::{ShutdownListener, ShutdownSignal};
pub use task::{Task, TaskStatus};
pub use work_queue::WorkQueue;

/// Maximum number of tasks that can be in flight per worker channel.
///
/// Tasks are long-lived loops, so a worker that has accepted one is busy until
/// shutdown.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

/// A communication channel between the pool and one worker thread.
#[derive(Debug)]
struct TaskChannel {
    task_sender: Sender<Box<dyn Task>>,
    num_tasks_in_flight: usize,
    worker: JoinHandle<()>,
}

/// A named pool of worker threads running long-lived tasks.
///
/// Tasks that arrive while every worker is busy are kept in `queued_tasks`
/// and never run; a correctly sized pool has one worker per task.
pub struct WorkerPool {
    name: &'static str,
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task>>,
    current_channel: usize,
}

impl WorkerPool {
    /// Creates a pool with `num_workers` threads named `"{name}-worker-{i}"`.
    ///
    /// # Panics
    /// Panics if the operating system refuses to spawn a thread.
    pub fn new(name: &'static str, num_workers: usize, shutdown: ShutdownListener) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        for index in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task>>();
            let shutdown = shutdown.clone();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    run_task(task, &shutdown);
                }
            };

            let worker = thread::Builder::new()
                .name(format!("{name}-worker-{index}"))
                .spawn(task_closure)
                .unwrap_or_else(|err| panic!("failed to spawn {name} worker {index}: {err}"));

            channels.push(TaskChannel {
                task_sender: task_tx,
                num_tasks_in_flight: 0,
                worker,
            });
        }

        info!("Worker pool '{}' started with {} workers", name, num_workers);

        WorkerPool {
            name,
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn num_workers(&self) -> usize {
        self.channels.len()
    }

    /// Number of published tasks that found no idle worker.
    pub fn num_queued_tasks(&self) -> usize {
        self.queued_tasks.len()
    }

    fn try_send_task(&mut self, task: Box<dyn Task>, channel_idx: usize) -> Result<(), Box<dyn Task>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(err) => Err(err.0),
        }
    }

    /// Finds the next worker, round-robin from the last used one, that can accept a task.
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }

        let len = self.channels.len();
        (0..len)
            .map(|offset| (self.current_channel + offset) % len)
            .find(|&idx| self.channels[idx].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT)
    }

    /// Hands a task to an idle worker.
    ///
    /// # Returns
    /// - `true` if the task was scheduled on a worker
    /// - `false` if every worker was busy and the task was queued instead
    pub fn publish_task(&mut self, task: Box<dyn Task>) -> bool {
        let task_name = task.name();

        let Some(channel_idx) = self.find_available_channel() else {
            warn!(
                "Worker pool '{}' is saturated, task '{}' queued",
                self.name, task_name
            );
            self.queued_tasks.push_back(task);
            return false;
        };

        match self.try_send_task(task, channel_idx) {
            Ok(_) => {
                self.current_channel = (channel_idx + 1) % self.channels.len();
                debug!(
                    "Task '{}' assigned to {}-worker-{}",
                    task_name, self.name, channel_idx
                );
                true
            }
            Err(task) => {
                warn!(
                    "Worker {} of pool '{}' is gone, task '{}' queued",
                    channel_idx, self.name, task_name
                );
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Closes every task channel and waits for the workers to exit.
    ///
    /// Workers only exit once their current task returns, so the shutdown
    /// signal must have been triggered first.
    pub fn join(self) {
        let WorkerPool {
            name,
            channels,
            queued_tasks,
            ..
        } = self;

        if !queued_tasks.is_empty() {
            warn!(
                "Worker pool '{}' dropped {} tasks that never ran",
                name,
                queued_tasks.len()
            );
        }

        for TaskChannel {
            task_sender, worker, ..
        } in channels
        {
            drop(task_sender);
            if worker.join().is_err() {
                warn!("A worker of pool '{}' panicked", name);
            }
        }

        info!("Worker pool '{}' stopped", name);
    }
}

/// Drives one task until shutdown.
fn run_task(mut task: Box<dyn Task>, shutdown: &ShutdownListener) {
    info!("Task '{}' started", task.name());

    let interval = task.poll_interval();
    let mut wake = task.wake_receiver().unwrap_or_else(crossbeam_channel::never);

    while !shutdown.is_shutdown() {
        if task.process() == TaskStatus::Busy {
            continue;
        }

        let mut waker_gone = false;
        select! {
            recv(shutdown.receiver()) -> _ => break,
            recv(wake) -> message => waker_gone = message.is_err(),
            default(interval) => {},
        }

        if waker_gone {
            // Fall back to the timer alone.
            wake = crossbeam_channel::never();
        }
    }

    info!("Task '{}' stopped", task.name());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    struct CountingTask {
        polls: Arc<AtomicUsize>,
        wake: Option<crossbeam_channel::Receiver<()>>,
        interval: Duration,
    }

    impl Task for CountingTask {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn process(&mut self) -> TaskStatus {
            self.polls.fetch_add(1, Ordering::SeqCst);
            TaskStatus::Idle
        }

        fn poll_interval(&self) -> Duration {
            self.interval
        }

        fn wake_receiver(&self) -> Option<crossbeam_channel::Receiver<()>> {
            self.wake.clone()
        }
    }

    fn wait_until(deadline: Duration, condition: impl Fn() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        condition()
    }

    #[test]
    fn tasks_beyond_worker_count_are_queued() {
        let mut signal = ShutdownSignal::new();
        let mut pool = WorkerPool::new("test", 1, signal.listener());
        let polls = Arc::new(AtomicUsize::new(0));

        let make = || {
            Box::new(CountingTask {
                polls: polls.clone(),
                wake: None,
                interval: Duration::from_millis(10),
            })
        };

        assert!(pool.publish_task(make()));
        assert!(!pool.publish_task(make()));
        assert_eq!(pool.num_queued_tasks(), 1);

        assert!(wait_until(Duration::from_secs(2), || polls.load(Ordering::SeqCst) >= 3));
        signal.trigger();
        pool.join();
    }

    #[test]
    fn wake_channel_cuts_the_poll_interval_short() {
        let mut signal = ShutdownSignal::new();
        let mut pool = WorkerPool::new("wake", 1, signal.listener());
        let polls = Arc::new(AtomicUsize::new(0));
        let (waker, wake) = crossbeam_channel::bounded(1);

        pool.publish_task(Box::new(CountingTask {
            polls: polls.clone(),
            wake: Some(wake),
            interval: Duration::from_secs(60),
        }));

        assert!(wait_until(Duration::from_secs(2), || polls.load(Ordering::SeqCst) == 1));
        waker.send(()).unwrap();
        assert!(wait_until(Duration::from_secs(2), || polls.load(Ordering::SeqCst) == 2));

        // Shutdown must not wait for the minute-long timer.
        let started = Instant::now();
        signal.trigger();
        pool.join();
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}

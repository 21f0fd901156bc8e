//! Replacement for the source `Thread` abstract base class (Design Notes): a plain
//! `std::thread::JoinHandle` plus a shared cancellation flag, with no inheritance.
//! Used by the per-lookup reloader threads and the 1 ms grant/heartbeat clock tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A cooperative cancellation flag shared between a spawned task and its owner.
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken(Arc::new(AtomicBool::new(false)))
    }

    /// Requests cancellation. The task observes this at its next suspension point.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Sleeps in short slices so cancellation is observed promptly instead of after
    /// the full duration.
    pub fn sleep_cancellable(&self, duration: Duration) {
        const SLICE: Duration = Duration::from_millis(50);
        let mut remaining = duration;
        while remaining > Duration::ZERO && !self.is_cancelled() {
            let step = remaining.min(SLICE);
            thread::sleep(step);
            remaining -= step;
        }
    }
}

/// A spawned, cancellable background task.
pub struct Task {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Task {
    /// Spawns `body` on its own OS thread, handing it a `CancellationToken`. `body`
    /// must check `token.is_cancelled()` at every suspension point and return promptly
    /// once it observes cancellation.
    pub fn spawn<F>(name: &str, body: F) -> Task
    where
        F: FnOnce(CancellationToken) + Send + 'static,
    {
        let token = CancellationToken::new();
        let task_token = token.clone();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || body(task_token))
            .expect("failed to spawn task thread");

        Task {
            token,
            handle: Some(handle),
        }
    }

    /// Signals cancellation and blocks until the task thread exits.
    pub fn stop(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;

    #[test]
    fn task_observes_cancellation() {
        let counter = Arc::new(AtomicU32::new(0));
        let worker_counter = counter.clone();

        let task = Task::spawn("test-task", move |token| {
            while !token.is_cancelled() {
                worker_counter.fetch_add(1, Ordering::SeqCst);
                token.sleep_cancellable(Duration::from_millis(10));
            }
        });

        thread::sleep(Duration::from_millis(60));
        task.stop();

        assert!(counter.load(Ordering::SeqCst) > 0);
    }
}

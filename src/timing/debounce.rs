//! Debounce wrapper: coalesce a burst of calls into one delayed execution.
//!
//! Every call aborts the pending execution (if any) and schedules a new one
//! `wait` after now, carrying the latest arguments. Only one task is pending at
//! any time, so arbitrarily frequent calls do not accumulate timers.

use crate::timing::Scheduler;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

type Callback<A> = Box<dyn FnMut(A) + Send>;

/// A callback that only runs once its calls have been quiet for `wait`.
pub struct Debounced<A: Send + 'static> {
    wait: Duration,
    scheduler: Scheduler,
    callback: Arc<Mutex<Callback<A>>>,
    pending: Option<JoinHandle<()>>,
}

impl<A: Send + 'static> Debounced<A> {
    pub fn new<F>(wait: Duration, scheduler: Scheduler, callback: F) -> Self
    where
        F: FnMut(A) + Send + 'static,
    {
        Self {
            wait,
            scheduler,
            callback: Arc::new(Mutex::new(Box::new(callback))),
            pending: None,
        }
    }

    /// Replace any pending execution with one carrying `args`
    pub fn call(&mut self, args: A) {
        self.cancel();
        let callback = Arc::clone(&self.callback);
        self.pending = Some(self.scheduler.spawn_after(self.wait, move || {
            let mut guard = callback.lock();
            let callback: &mut (dyn FnMut(A) + Send) = &mut **guard;
            callback(args);
        }));
    }

    /// Drop the pending execution without running it
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }
}

impl<A: Send + 'static> Drop for Debounced<A> {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl<A: Send + 'static> std::fmt::Debug for Debounced<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debounced")
            .field("wait", &self.wait)
            .field("pending", &self.is_pending())
            .finish()
    }
}

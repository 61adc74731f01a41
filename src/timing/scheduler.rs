//! One-shot timers bound to the tokio runtime that drives the page.

use crate::error::{PageKitError, Result};
use crate::event::PageEvent;
use log::trace;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Spawns deferred work and posts timer events back onto the page event queue.
#[derive(Debug, Clone)]
pub struct Scheduler {
    runtime: Handle,
    events: UnboundedSender<PageEvent>,
}

impl Scheduler {
    /// Bind to the runtime the caller is running on
    pub fn current(events: UnboundedSender<PageEvent>) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| PageKitError::runtime(e.to_string()))?;
        Ok(Self { runtime, events })
    }

    /// Post `event` onto the queue immediately
    pub fn post(&self, event: PageEvent) {
        if self.events.send(event).is_err() {
            trace!("event queue closed, dropping event");
        }
    }

    /// Fire-and-forget: post `event` after `delay`
    pub fn after(&self, delay: Duration, event: PageEvent) {
        let events = self.events.clone();
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if events.send(event).is_err() {
                trace!("event queue closed before timer fired");
            }
        });
    }

    /// Run `task` after `delay`; the returned handle can abort it before it fires
    pub fn spawn_after<F>(&self, delay: Duration, task: F) -> JoinHandle<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        })
    }

    /// Sender for posting events from outside the scheduler
    pub fn sender(&self) -> UnboundedSender<PageEvent> {
        self.events.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::time::{sleep, Instant};

    #[test]
    fn test_requires_runtime() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let result = Scheduler::current(tx);
        assert!(matches!(
            result,
            Err(PageKitError::RuntimeUnavailable { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_after_posts_event_once_delay_elapsed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = Scheduler::current(tx).unwrap();
        let start = Instant::now();

        scheduler.after(Duration::from_millis(500), PageEvent::LoaderDelayElapsed);
        sleep(Duration::from_millis(499)).await;
        assert!(rx.try_recv().is_err());

        let event = rx.recv().await.unwrap();
        assert_eq!(event, PageEvent::LoaderDelayElapsed);
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_post_is_immediate() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = Scheduler::current(tx).unwrap();
        scheduler.post(PageEvent::Load);
        assert_eq!(rx.try_recv().unwrap(), PageEvent::Load);
    }
}

//! Trailing-edge debounce timer
//!
//! Each call to [`Debouncer::schedule`] replaces the pending timer, so a
//! burst of triggers produces a single action once the burst goes quiet.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Cancellable, replaceable timer
///
/// Must be used from within a Tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Run `action` after the quiet period, cancelling any earlier schedule
    ///
    /// When the timer fires the action is spawned as its own task, so a
    /// later `schedule` or `cancel` never interrupts an action already
    /// under way.
    pub fn schedule<F, Fut>(&self, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(action());
        });

        if let Some(previous) = self.slot().replace(timer) {
            previous.abort();
        }
    }

    /// Cancel the pending timer
    ///
    /// Returns true if a timer was still waiting to fire.
    pub fn cancel(&self) -> bool {
        match self.slot().take() {
            Some(timer) => {
                let was_pending = !timer.is_finished();
                timer.abort();
                was_pending
            }
            None => false,
        }
    }

    /// Whether a timer is waiting to fire
    pub fn is_pending(&self) -> bool {
        self.slot()
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(timer) = self.slot().take() {
            timer.abort();
        }
    }
}

//! Cancellable one-shot timers that post events back to the owning loop.
//!
//! DESIGN
//! ======
//! Each scheduled task sleeps on the tokio timer and then sends its event
//! into the controller's channel. Every task gets a fresh [`TimerToken`] that
//! the event carries, so the receiver can tell a live timer from one that was
//! cancelled after it had already fired (its event may still be queued).
//!
//! `TimerHandle::cancel` aborts the task; calling it again, or after the
//! task completed, does nothing.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::Instant;

/// Identity of one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub struct TimerHandle {
    token: TimerToken,
    abort: AbortHandle,
}

impl TimerHandle {
    #[must_use]
    pub fn token(&self) -> TimerToken {
        self.token
    }

    pub fn cancel(&self) {
        self.abort.abort();
    }

    /// True once the task has fired or been cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Spawns delayed events onto the controller's queue.
#[derive(Debug)]
pub struct Scheduler<E> {
    tx: mpsc::UnboundedSender<E>,
    next_token: u64,
}

impl<E: Send + 'static> Scheduler<E> {
    /// Create a scheduler and the receiver its events arrive on.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<E>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    #[must_use]
    pub fn new(tx: mpsc::UnboundedSender<E>) -> Self {
        Self { tx, next_token: 0 }
    }

    /// Deliver `make_event(token)` after `delay`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, delay: Duration, make_event: impl FnOnce(TimerToken) -> E) -> TimerHandle {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        let event = make_event(token);
        let tx = self.tx.clone();
        let deadline = deadline_after(delay);
        let task = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            // Receiver gone means the session ended; nothing left to notify.
            let _ = tx.send(event);
        });
        tracing::debug!(token = token.0, delay_ms = delay.as_millis(), "timer scheduled");
        TimerHandle { token, abort: task.abort_handle() }
    }
}

/// Upper bound for a single delay; longer ones are clamped rather than overflowing `Instant`.
const MAX_DELAY: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

fn deadline_after(delay: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(delay.min(MAX_DELAY)).unwrap_or(now)
}

#[cfg(test)]
#[path = "timer_test.rs"]
mod tests;

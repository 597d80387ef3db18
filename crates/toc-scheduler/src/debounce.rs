//! Debounced callbacks.
//!
//! Every `schedule` call cancels the callback still waiting on the same
//! debouncer and starts a fresh quiet period. Only the last callback runs,
//! once, after `delay` without further calls.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::{DebounceConfig, SchedulerError};

struct Pending {
    generation: u64,
    token: CancellationToken,
}

#[derive(Default)]
struct Slot {
    generation: u64,
    pending: Option<Pending>,
    /// Generation whose callback is executing right now
    running: Option<u64>,
}

/// Collapses bursts of calls into one delayed callback.
///
/// Instances are independent; each owns its single pending timer. Dropping the
/// debouncer cancels a callback that has not fired yet.
pub struct Debouncer {
    delay: Duration,
    handle: Handle,
    slot: Arc<Mutex<Slot>>,
}

impl Debouncer {
    /// Create a debouncer on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::NoRuntime` outside a tokio runtime.
    pub fn new(delay: Duration) -> Result<Self, SchedulerError> {
        let handle = Handle::try_current().map_err(|e| SchedulerError::NoRuntime(e.to_string()))?;
        Ok(Self::with_handle(delay, handle))
    }

    /// Create a debouncer that spawns its timers on `handle`.
    pub fn with_handle(delay: Duration, handle: Handle) -> Self {
        Self {
            delay,
            handle,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Create from validated configuration.
    pub fn from_config(config: &DebounceConfig) -> Result<Self, SchedulerError> {
        config.validate()?;
        Self::new(config.delay())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `callback` once `delay` passes without another `schedule` call.
    ///
    /// A callback scheduled earlier on this debouncer that has not fired yet
    /// is dropped without running.
    pub fn schedule<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let token = CancellationToken::new();
        let generation = {
            let mut slot = lock(&self.slot);
            if let Some(previous) = slot.pending.take() {
                previous.token.cancel();
                trace!(generation = previous.generation, "Superseded pending callback");
            }
            let generation = slot.generation + 1;
            slot.generation = generation;
            slot.pending = Some(Pending {
                generation,
                token: token.clone(),
            });
            generation
        };

        let slot = Arc::clone(&self.slot);
        let delay = self.delay;

        self.handle.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            // A later schedule may have landed between the timer firing and
            // this task running; only the current generation may fire.
            let fire = {
                let mut slot = lock(&slot);
                let current = slot
                    .pending
                    .as_ref()
                    .is_some_and(|p| p.generation == generation);
                if current {
                    slot.pending = None;
                    slot.running = Some(generation);
                }
                current
            };

            if fire {
                trace!(generation, "Running debounced callback");
                callback();

                let mut slot = lock(&slot);
                if slot.running == Some(generation) {
                    slot.running = None;
                }
            }
        });
    }

    /// Drop the pending callback, if any. A callback already running finishes.
    pub fn cancel(&self) {
        if let Some(pending) = lock(&self.slot).pending.take() {
            pending.token.cancel();
            trace!(generation = pending.generation, "Cancelled pending callback");
        }
    }

    /// True from `schedule` until the callback has returned or been cancelled.
    pub fn is_pending(&self) -> bool {
        let slot = lock(&self.slot);
        slot.pending.is_some() || slot.running.is_some()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Create a debouncer with a delay in milliseconds.
///
/// ```ignore
/// let debouncer = make_debouncer(250)?;
/// debouncer.schedule(|| refresh_search_results());
/// ```
pub fn make_debouncer(delay_ms: u64) -> Result<Debouncer, SchedulerError> {
    Debouncer::new(Duration::from_millis(delay_ms))
}

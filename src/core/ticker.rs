//! Periodic tick source backing the countdown.
//!
//! A `TickHandle` stands for one live periodic callback. Fires are not
//! delivered by calling into the widget directly; the tokio ticker sends the
//! handle's `TickId` over a channel that the event loop drains, so all state
//! mutation stays on the single event-loop thread.

use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;

/// Interval between countdown fires
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Generation of an armed tick source; fires from older generations are stale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickId(pub u64);

/// Something that can arm a periodic callback
pub trait Ticker {
    /// Arm a new periodic source. The first fire comes one full period later.
    fn arm(&mut self, period: Duration) -> TickHandle;
}

/// A live periodic callback. Cancelled explicitly or when dropped.
pub struct TickHandle {
    id: TickId,
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TickHandle {
    pub fn new(id: TickId, cancel: impl FnOnce() + 'static) -> Self {
        Self {
            id,
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn id(&self) -> TickId {
        self.id
    }

    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for TickHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickHandle")
            .field("id", &self.id)
            .field("live", &self.cancel.is_some())
            .finish()
    }
}

/// Tick source running on the tokio runtime
pub struct TokioTicker {
    tx: mpsc::UnboundedSender<TickId>,
    next_id: u64,
}

impl TokioTicker {
    pub fn new(tx: mpsc::UnboundedSender<TickId>) -> Self {
        Self { tx, next_id: 0 }
    }
}

impl Ticker for TokioTicker {
    fn arm(&mut self, period: Duration) -> TickHandle {
        self.next_id += 1;
        let id = TickId(self.next_id);
        let tx = self.tx.clone();

        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            loop {
                interval.tick().await;
                if tx.send(id).is_err() {
                    // Event loop is gone
                    break;
                }
            }
        });

        tracing::debug!("Armed tick source {:?} every {:?}", id, period);
        TickHandle::new(id, move || {
            task.abort();
            tracing::debug!("Cancelled tick source {:?}", id);
        })
    }
}

/// Test double: never fires on its own, counts live handles
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    live: std::rc::Rc<std::cell::Cell<usize>>,
    armed: std::rc::Rc<std::cell::Cell<u64>>,
}

#[cfg(test)]
impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles armed and not yet cancelled
    pub fn live_handles(&self) -> usize {
        self.live.get()
    }

    /// Total handles ever armed
    pub fn armed_count(&self) -> u64 {
        self.armed.get()
    }
}

#[cfg(test)]
impl Ticker for ManualTicker {
    fn arm(&mut self, _period: Duration) -> TickHandle {
        self.armed.set(self.armed.get() + 1);
        self.live.set(self.live.get() + 1);
        let live = self.live.clone();
        TickHandle::new(TickId(self.armed.get()), move || live.set(live.get() - 1))
    }
}

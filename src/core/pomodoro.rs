//! The Pomodoro widget core: countdown engine plus the persist/render hooks.
//!
//! Every mutating operation ends with a storage write and a render request.
//! Position and minimize operations live in `position.rs`.

use super::persistence::{load_state, save_state};
use super::storage::Storage;
use super::ticker::{TickHandle, TickId, Ticker, TICK_PERIOD};
use crate::data::{WidgetState, DEFAULT_DURATION_SECS};
use anyhow::Result;

/// State machine: Stopped <-> Running, with a single live tick source while running
pub struct Pomodoro<S: Storage, T: Ticker> {
    pub(super) state: WidgetState,
    tick: Option<TickHandle>,
    storage: S,
    ticker: T,
    render_requested: bool,
}

impl<S: Storage, T: Ticker> Pomodoro<S, T> {
    /// Widget with compiled-in defaults, not yet restored from storage
    pub fn new(storage: S, ticker: T) -> Self {
        Self {
            state: WidgetState::default(),
            tick: None,
            storage,
            ticker,
            render_requested: true,
        }
    }

    /// Create the widget and restore any saved state before the first paint
    pub fn mount(storage: S, ticker: T) -> Result<Self> {
        let mut pomodoro = Self::new(storage, ticker);
        pomodoro.restore()?;
        Ok(pomodoro)
    }

    /// Overwrite state from storage and resume a running countdown as-is
    ///
    /// The countdown continues from the saved remaining value; time that passed
    /// while the widget was not mounted is not subtracted.
    pub fn restore(&mut self) -> Result<()> {
        let Some(saved) = load_state(&self.storage)? else {
            tracing::info!("No saved widget state, using defaults");
            return Ok(());
        };

        tracing::info!(
            "Restored widget state: {} remaining, running={}, minimized={}, pos=({},{})",
            saved.display_time(),
            saved.is_running,
            saved.is_minimized,
            saved.pos_x,
            saved.pos_y
        );
        self.state = saved;

        if self.state.is_running {
            self.start()?;
        }

        // Load happens outside the normal mutation path
        self.render_requested = true;
        Ok(())
    }

    /// Release the tick source without touching the saved record
    ///
    /// A countdown that was running stays `isRunning: true` in storage and
    /// resumes on the next mount.
    pub fn unmount(&mut self) {
        if let Some(handle) = self.tick.take() {
            tracing::debug!("Unmounting with live tick source {:?}", handle.id());
            handle.cancel();
        }
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    /// True while a tick source is armed
    pub fn is_ticking(&self) -> bool {
        self.tick.is_some()
    }

    pub fn tick_id(&self) -> Option<TickId> {
        self.tick.as_ref().map(TickHandle::id)
    }

    /// Consume the pending redraw request, if any
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.render_requested)
    }

    /// Begin counting down. No-op while a tick source already exists.
    pub fn start(&mut self) -> Result<()> {
        if self.tick.is_some() {
            tracing::debug!("start() ignored: already running");
            return Ok(());
        }

        // The flag and the tick source change together; a failed write only loses the save
        self.tick = Some(self.ticker.arm(TICK_PERIOD));
        self.state.is_running = true;
        tracing::info!("Timer started at {}", self.state.display_time());
        self.persist()
    }

    /// Stop counting down. No-op when no tick source exists.
    pub fn stop(&mut self) -> Result<()> {
        let Some(handle) = self.tick.take() else {
            tracing::debug!("stop() ignored: not running");
            return Ok(());
        };

        handle.cancel();
        self.state.is_running = false;
        tracing::info!("Timer stopped at {}", self.state.display_time());
        self.persist()
    }

    /// Stop and rewind the countdown. Position and minimized flag are kept.
    pub fn reset(&mut self) -> Result<()> {
        let stopped = self.stop();
        self.state.remaining_seconds = DEFAULT_DURATION_SECS;
        self.state.is_running = false;
        tracing::info!("Timer reset to {}", self.state.display_time());
        stopped.and(self.persist())
    }

    /// One fire of the tick source
    ///
    /// Fires from a cancelled or replaced source are ignored. Reaching zero
    /// stops the timer; a fire arriving at zero stops it without decrementing.
    pub fn on_tick(&mut self, id: TickId) -> Result<()> {
        if self.tick_id() != Some(id) {
            tracing::trace!("Ignoring stale tick {:?}", id);
            return Ok(());
        }

        if self.state.remaining_seconds == 0 {
            return self.stop();
        }

        self.state.remaining_seconds -= 1;
        tracing::trace!("Tick: {}", self.state.display_time());

        if self.state.remaining_seconds == 0 {
            tracing::info!("Countdown finished");
            return self.stop();
        }
        self.persist()
    }

    /// On-write hook run at the end of every mutation
    pub(super) fn persist(&mut self) -> Result<()> {
        self.render_requested = true;
        save_state(&mut self.storage, &self.state)
    }
}

//! Frontend abstraction layer
//!
//! This module defines the `Frontend` trait the terminal frontend implements:
//! event polling, rendering the widget state, and cleanup.

pub mod events;
pub mod tui;

use crate::data::WidgetState;
use anyhow::Result;
pub use events::FrontendEvent;
pub use tui::TuiFrontend;

/// Render surface and input source for the widget
pub trait Frontend {
    /// Poll for user input events
    ///
    /// Returns all pending events (keyboard, mouse, resize) converted to the
    /// frontend-agnostic `FrontendEvent` enum; empty if none arrived before
    /// the poll timeout.
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>>;

    /// Draw the widget for the given state
    fn render(&mut self, state: &WidgetState) -> Result<()>;

    /// Restore the terminal before exit
    fn cleanup(&mut self) -> Result<()>;

    /// Current page size in cells as `(width, height)`
    fn size(&self) -> (u16, u16);
}

//! Data layer - Pure state without UI coupling
//!
//! NO imports from frontend/ or any rendering code.
//! The TUI frontend reads from these structures to render.

pub mod layout;
pub mod ui_state;
pub mod widget_state;

pub use layout::*;
pub use ui_state::*;
pub use widget_state::*;

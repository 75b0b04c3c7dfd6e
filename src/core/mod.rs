//! Core widget logic
//!
//! Timer engine, position tracker and persistence bridge, plus the input
//! routing that feeds them. NO imports from frontend/ or rendering code.
//! Core updates the widget state, the frontend reads and renders it.

pub mod app_core;
pub mod input_router;
pub mod persistence;
pub mod pomodoro;
pub mod position;
pub mod storage;
pub mod ticker;

pub use app_core::AppCore;
pub use pomodoro::Pomodoro;
pub use storage::{FileStorage, Storage};
pub use ticker::{TickId, TokioTicker};

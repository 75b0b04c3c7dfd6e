//! UI State - pointer interaction state
//!
//! This module contains UI state that is independent of rendering.
//! The widget's own persisted fields live in `WidgetState`; everything here
//! is transient and dies with the process.

/// Something the user asked the widget to do (button click or key binding)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WidgetAction {
    Start,
    Stop,
    Reset,
    ToggleMinimize,
    Quit,
}

impl WidgetAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Reset => "reset",
            Self::ToggleMinimize => "minimize",
            Self::Quit => "quit",
        }
    }
}

/// Application UI state
#[derive(Clone, Debug)]
pub struct UiState {
    /// Size of the page body (terminal area) in cells
    pub viewport: (u16, u16),

    /// Active drag gesture on the widget, if any
    pub drag: Option<DragGesture>,
}

impl UiState {
    pub fn new(viewport: (u16, u16)) -> Self {
        Self {
            viewport,
            drag: None,
        }
    }
}

/// An in-progress drag of the widget
///
/// The pointer only reports absolute cells, so the gesture remembers the last
/// pointer cell and turns each move into a relative delta.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragGesture {
    pub last_pos: (u16, u16),
    /// Set once any non-zero delta was applied; a release without movement is a click
    pub moved: bool,
}

impl DragGesture {
    pub fn begin(col: u16, row: u16) -> Self {
        Self {
            last_pos: (col, row),
            moved: false,
        }
    }

    /// Advance the gesture to a new pointer cell, returning the relative delta
    pub fn advance(&mut self, col: u16, row: u16) -> (i32, i32) {
        let dx = col as i32 - self.last_pos.0 as i32;
        let dy = row as i32 - self.last_pos.1 as i32;
        self.last_pos = (col, row);
        if dx != 0 || dy != 0 {
            self.moved = true;
        }
        (dx, dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_gesture_deltas_are_relative() {
        let mut gesture = DragGesture::begin(10, 5);
        assert_eq!(gesture.advance(13, 9), (3, 4));
        assert_eq!(gesture.advance(12, 11), (-1, 2));
        assert_eq!(gesture.last_pos, (12, 11));
        assert!(gesture.moved);
    }

    #[test]
    fn test_drag_gesture_without_movement_is_click() {
        let mut gesture = DragGesture::begin(4, 4);
        assert_eq!(gesture.advance(4, 4), (0, 0));
        assert!(!gesture.moved);
    }
}

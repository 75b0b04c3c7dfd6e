//! Input routing for the widget
//!
//! Routes keyboard input through the configured keybinds and pointer input
//! through the card layout: buttons fire actions, presses on the card body
//! start a drag, and moves during a drag become relative deltas.

use crate::data::{CardLayout, DragGesture, WidgetAction};
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};
use std::collections::HashMap;

/// What a pointer event means for the widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerOutcome {
    /// An enabled button was pressed
    Action(WidgetAction),
    /// Press on the card body or icon; a drag gesture is now active
    DragStarted,
    /// Pointer moved during a drag
    Dragged { dx: i32, dy: i32 },
    /// Drag released. `moved` is false for a plain click.
    Released { dx: i32, dy: i32, moved: bool },
    Ignored,
}

/// Resolve a key press to an action
///
/// Ctrl+C always quits, whatever the keybinds say.
pub fn route_key(
    code: KeyCode,
    modifiers: KeyModifiers,
    keybind_map: &HashMap<(KeyCode, KeyModifiers), WidgetAction>,
) -> Option<WidgetAction> {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Some(WidgetAction::Quit);
    }
    keybind_map.get(&(code, modifiers)).copied()
}

/// Resolve a pointer event against the current layout, updating the drag gesture
pub fn route_mouse(
    kind: MouseEventKind,
    col: u16,
    row: u16,
    layout: &CardLayout,
    drag: &mut Option<DragGesture>,
) -> PointerOutcome {
    match kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(target) = layout.target_at(col, row) {
                return if target.enabled {
                    PointerOutcome::Action(target.action)
                } else {
                    PointerOutcome::Ignored
                };
            }
            if layout.contains(col, row) {
                *drag = Some(DragGesture::begin(col, row));
                return PointerOutcome::DragStarted;
            }
            PointerOutcome::Ignored
        }
        MouseEventKind::Drag(MouseButton::Left) => match drag.as_mut() {
            Some(gesture) => {
                let (dx, dy) = gesture.advance(col, row);
                PointerOutcome::Dragged { dx, dy }
            }
            None => PointerOutcome::Ignored,
        },
        MouseEventKind::Up(MouseButton::Left) => match drag.take() {
            Some(mut gesture) => {
                let (dx, dy) = gesture.advance(col, row);
                PointerOutcome::Released {
                    dx,
                    dy,
                    moved: gesture.moved,
                }
            }
            None => PointerOutcome::Ignored,
        },
        _ => PointerOutcome::Ignored,
    }
}

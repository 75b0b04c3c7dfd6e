//! Position tracker: drag deltas, end-of-drag clamping and minimize.

use super::pomodoro::Pomodoro;
use super::storage::Storage;
use super::ticker::Ticker;
use anyhow::Result;

/// Width/height pair in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub width: i32,
    pub height: i32,
}

impl Extent {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
        }
    }
}

/// Clamp a top-left position so a widget of `widget` size stays inside `bounds`
///
/// When the widget is larger than the bounds it is pinned to the top-left edge.
pub fn clamp_position(pos: (i32, i32), widget: Extent, bounds: Extent) -> (i32, i32) {
    let max_x = (bounds.width - widget.width).max(0);
    let max_y = (bounds.height - widget.height).max(0);
    (pos.0.clamp(0, max_x), pos.1.clamp(0, max_y))
}

impl<S: Storage, T: Ticker> Pomodoro<S, T> {
    /// Move by a relative pointer delta
    ///
    /// Called once per pointer-move event; deltas are applied additively and
    /// never coalesced. Bounds are not enforced until the drag ends.
    pub fn apply_drag_delta(&mut self, dx: i32, dy: i32) -> Result<()> {
        self.state.pos_x = self.state.pos_x.saturating_add(dx);
        self.state.pos_y = self.state.pos_y.saturating_add(dy);
        tracing::trace!(
            "Drag delta ({}, {}) -> pos ({}, {})",
            dx,
            dy,
            self.state.pos_x,
            self.state.pos_y
        );
        self.persist()
    }

    /// Settle the widget inside the page body once a drag is released
    pub fn end_drag(&mut self, widget: Extent, bounds: Extent) -> Result<()> {
        let current = (self.state.pos_x, self.state.pos_y);
        let clamped = clamp_position(current, widget, bounds);
        if clamped == current {
            tracing::debug!("Drag ended at ({}, {})", current.0, current.1);
            return Ok(());
        }

        tracing::debug!(
            "Drag ended out of bounds at ({}, {}), settled to ({}, {})",
            current.0,
            current.1,
            clamped.0,
            clamped.1
        );
        self.state.pos_x = clamped.0;
        self.state.pos_y = clamped.1;
        self.persist()
    }

    /// Switch between the full card and the icon. The anchor does not move.
    pub fn toggle_minimize(&mut self) -> Result<()> {
        self.state.is_minimized = !self.state.is_minimized;
        tracing::info!(
            "Widget {}",
            if self.state.is_minimized {
                "minimized"
            } else {
                "restored"
            }
        );
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persistence::load_state;
    use crate::core::storage::MemoryStorage;
    use crate::core::ticker::ManualTicker;

    fn widget() -> (Pomodoro<MemoryStorage, ManualTicker>, MemoryStorage) {
        let storage = MemoryStorage::new();
        let pomodoro = Pomodoro::mount(storage.clone(), ManualTicker::new()).unwrap();
        (pomodoro, storage)
    }

    #[test]
    fn test_drag_deltas_are_additive() {
        let (mut pomodoro, storage) = widget();
        pomodoro.apply_drag_delta(3, 4).unwrap();
        pomodoro.apply_drag_delta(-1, 2).unwrap();
        assert_eq!((pomodoro.state().pos_x, pomodoro.state().pos_y), (2, 6));

        let saved = load_state(&storage).unwrap().unwrap();
        assert_eq!((saved.pos_x, saved.pos_y), (2, 6));
    }

    #[test]
    fn test_every_delta_is_applied() {
        let (mut pomodoro, _storage) = widget();
        for _ in 0..100 {
            pomodoro.apply_drag_delta(1, -1).unwrap();
        }
        assert_eq!((pomodoro.state().pos_x, pomodoro.state().pos_y), (100, -100));
    }

    #[test]
    fn test_drag_may_leave_bounds_until_released() {
        let (mut pomodoro, storage) = widget();
        pomodoro.apply_drag_delta(-10, 500).unwrap();
        assert_eq!((pomodoro.state().pos_x, pomodoro.state().pos_y), (-10, 500));

        pomodoro
            .end_drag(Extent::new(26, 9), Extent::new(80, 24))
            .unwrap();
        assert_eq!((pomodoro.state().pos_x, pomodoro.state().pos_y), (0, 15));

        let saved = load_state(&storage).unwrap().unwrap();
        assert_eq!((saved.pos_x, saved.pos_y), (0, 15));
    }

    #[test]
    fn test_end_drag_in_bounds_keeps_position() {
        let (mut pomodoro, _storage) = widget();
        pomodoro.apply_drag_delta(5, 5).unwrap();
        pomodoro.take_render_request();
        pomodoro
            .end_drag(Extent::new(26, 9), Extent::new(80, 24))
            .unwrap();
        assert_eq!((pomodoro.state().pos_x, pomodoro.state().pos_y), (5, 5));
        assert!(!pomodoro.take_render_request());
    }

    #[test]
    fn test_drag_near_integer_limits_saturates() {
        let (mut pomodoro, _storage) = widget();
        pomodoro.state.pos_x = i32::MAX - 3;
        pomodoro.state.pos_y = i32::MIN + 3;
        pomodoro.apply_drag_delta(10, -10).unwrap();
        assert_eq!((pomodoro.state().pos_x, pomodoro.state().pos_y), (i32::MAX, i32::MIN));

        pomodoro
            .end_drag(Extent::new(26, 9), Extent::new(80, 24))
            .unwrap();
        assert_eq!((pomodoro.state().pos_x, pomodoro.state().pos_y), (54, 0));
    }

    #[test]
    fn test_clamp_position() {
        let widget = Extent::new(6, 3);
        let bounds = Extent::new(20, 10);
        assert_eq!(clamp_position((-3, -3), widget, bounds), (0, 0));
        assert_eq!(clamp_position((30, 30), widget, bounds), (14, 7));
        assert_eq!(clamp_position((4, 2), widget, bounds), (4, 2));
        // Widget larger than the page pins to the origin
        assert_eq!(clamp_position((5, 5), Extent::new(40, 20), bounds), (0, 0));
    }

    #[test]
    fn test_toggle_minimize_twice_is_identity() {
        let (mut pomodoro, storage) = widget();
        pomodoro.apply_drag_delta(8, 3).unwrap();
        pomodoro.start().unwrap();
        let before = pomodoro.state().clone();

        pomodoro.toggle_minimize().unwrap();
        assert!(pomodoro.state().is_minimized);
        assert_eq!(pomodoro.state().pos_x, before.pos_x);
        assert_eq!(pomodoro.state().pos_y, before.pos_y);
        assert!(load_state(&storage).unwrap().unwrap().is_minimized);

        pomodoro.toggle_minimize().unwrap();
        assert_eq!(pomodoro.state(), &before);
        assert!(pomodoro.is_ticking());
    }
}

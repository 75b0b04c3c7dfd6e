use super::input_router::{route_key, route_mouse, PointerOutcome};
use super::pomodoro::Pomodoro;
use super::position::Extent;
use super::storage::Storage;
use super::ticker::{TickId, Ticker};
use crate::config::Config;
use crate::data::{CardLayout, UiState, WidgetAction, WidgetState};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers, MouseEventKind};
use std::collections::HashMap;

/// Core application state (frontend-agnostic)
///
/// AppCore owns the widget and the transient pointer state, and translates
/// input into widget operations. The frontend only reads `state()` to draw.
pub struct AppCore<S: Storage, T: Ticker> {
    /// The widget itself
    pub pomodoro: Pomodoro<S, T>,

    /// Drag gesture and page size
    pub ui_state: UiState,

    /// Parsed keybindings map (key combo -> action)
    pub keybind_map: HashMap<(KeyCode, KeyModifiers), WidgetAction>,

    /// Application running flag
    pub running: bool,

    /// Redraw needed for reasons outside the widget (resize)
    pub needs_render: bool,
}

impl<S: Storage, T: Ticker> AppCore<S, T> {
    /// Mount the widget (restoring saved state) and set up input handling
    pub fn new(config: &Config, storage: S, ticker: T, viewport: (u16, u16)) -> Result<Self> {
        let pomodoro = Pomodoro::mount(storage, ticker)?;
        Ok(Self {
            pomodoro,
            ui_state: UiState::new(viewport),
            keybind_map: config.keybinds.to_keybind_map(),
            running: true,
            needs_render: true,
        })
    }

    pub fn state(&self) -> &WidgetState {
        self.pomodoro.state()
    }

    /// Run a user action against the widget
    pub fn dispatch(&mut self, action: WidgetAction) -> Result<()> {
        tracing::debug!("Action: {}", action.name());
        match action {
            WidgetAction::Start => self.pomodoro.start(),
            WidgetAction::Stop => self.pomodoro.stop(),
            WidgetAction::Reset => self.pomodoro.reset(),
            WidgetAction::ToggleMinimize => self.pomodoro.toggle_minimize(),
            WidgetAction::Quit => {
                self.running = false;
                Ok(())
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        match route_key(code, modifiers, &self.keybind_map) {
            Some(action) => self.dispatch(action),
            None => Ok(()),
        }
    }

    pub fn handle_mouse(&mut self, kind: MouseEventKind, x: u16, y: u16) -> Result<()> {
        let layout = CardLayout::for_state(self.pomodoro.state());
        match route_mouse(kind, x, y, &layout, &mut self.ui_state.drag) {
            PointerOutcome::Action(action) => self.dispatch(action),
            PointerOutcome::Dragged { dx, dy } => self.pomodoro.apply_drag_delta(dx, dy),
            PointerOutcome::Released { dx, dy, moved } => {
                if dx != 0 || dy != 0 {
                    self.pomodoro.apply_drag_delta(dx, dy)?;
                }
                if !moved && layout.minimized {
                    // A plain click on the icon restores the card
                    return self.pomodoro.toggle_minimize();
                }
                self.settle()
            }
            PointerOutcome::DragStarted | PointerOutcome::Ignored => Ok(()),
        }
    }

    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.ui_state.viewport = (width, height);
        self.needs_render = true;
    }

    /// Deliver a fire from the tick source
    pub fn on_tick(&mut self, id: TickId) -> Result<()> {
        self.pomodoro.on_tick(id)
    }

    /// Consume pending redraw requests from the widget and the app
    pub fn take_render_request(&mut self) -> bool {
        let widget = self.pomodoro.take_render_request();
        std::mem::take(&mut self.needs_render) || widget
    }

    /// Release the tick source; the saved record is left as-is for the next launch
    pub fn shutdown(&mut self) {
        if self.pomodoro.is_ticking() {
            tracing::info!(
                "Leaving countdown at {}; it resumes on next launch",
                self.pomodoro.state().display_time()
            );
        }
        self.pomodoro.unmount();
    }

    /// End-of-drag clamp into the page body
    fn settle(&mut self) -> Result<()> {
        let (width, height) = CardLayout::size(self.pomodoro.state().is_minimized);
        let (page_width, page_height) = self.ui_state.viewport;
        self.pomodoro
            .end_drag(Extent::new(width, height), Extent::new(page_width, page_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persistence::load_state;
    use crate::core::storage::MemoryStorage;
    use crate::core::ticker::ManualTicker;
    use crate::data::{CARD_HEIGHT, ICON_HEIGHT, ICON_WIDTH};
    use crossterm::event::MouseButton;

    type TestCore = AppCore<MemoryStorage, ManualTicker>;

    fn app() -> (TestCore, MemoryStorage, ManualTicker) {
        let storage = MemoryStorage::new();
        let ticker = ManualTicker::new();
        let core = AppCore::new(
            &Config::default(),
            storage.clone(),
            ticker.clone(),
            (80, 24),
        )
        .unwrap();
        (core, storage, ticker)
    }

    fn press(core: &mut TestCore, x: u16, y: u16) {
        core.handle_mouse(MouseEventKind::Down(MouseButton::Left), x, y)
            .unwrap();
    }

    fn drag_to(core: &mut TestCore, x: u16, y: u16) {
        core.handle_mouse(MouseEventKind::Drag(MouseButton::Left), x, y)
            .unwrap();
    }

    fn release(core: &mut TestCore, x: u16, y: u16) {
        core.handle_mouse(MouseEventKind::Up(MouseButton::Left), x, y)
            .unwrap();
    }

    #[test]
    fn test_keybinds_drive_timer() {
        let (mut core, _storage, ticker) = app();
        core.handle_key(KeyCode::Char('s'), KeyModifiers::NONE).unwrap();
        core.handle_key(KeyCode::Char('s'), KeyModifiers::NONE).unwrap();
        assert!(core.state().is_running);
        assert_eq!(ticker.live_handles(), 1);

        core.handle_key(KeyCode::Char('x'), KeyModifiers::NONE).unwrap();
        assert!(!core.state().is_running);
        assert_eq!(ticker.live_handles(), 0);

        core.handle_key(KeyCode::Char('q'), KeyModifiers::NONE).unwrap();
        assert!(!core.running);
    }

    #[test]
    fn test_button_clicks() {
        let (mut core, _storage, ticker) = app();
        let row = CARD_HEIGHT - 2;
        press(&mut core, 4, row); // Start
        release(&mut core, 4, row);
        assert!(core.state().is_running);
        assert_eq!(ticker.live_handles(), 1);

        press(&mut core, 19, row); // Reset
        assert!(!core.state().is_running);
        assert_eq!(core.state().remaining_seconds, 1500);

        press(&mut core, 20, 1); // Minimize
        assert!(core.state().is_minimized);
    }

    #[test]
    fn test_drag_moves_and_clamps_on_release() {
        let (mut core, storage, _ticker) = app();
        press(&mut core, 2, 3);
        drag_to(&mut core, 10, 5);
        drag_to(&mut core, 79, 23);
        // Mid-drag the card may hang past the page edge
        assert_eq!((core.state().pos_x, core.state().pos_y), (77, 20));

        release(&mut core, 79, 23);
        // Page is 80x24 and the card 26x9
        assert_eq!((core.state().pos_x, core.state().pos_y), (54, 15));
        let saved = load_state(&storage).unwrap().unwrap();
        assert_eq!((saved.pos_x, saved.pos_y), (54, 15));
        assert!(core.ui_state.drag.is_none());
    }

    #[test]
    fn test_icon_click_restores_and_drag_does_not() {
        let (mut core, _storage, _ticker) = app();
        core.dispatch(WidgetAction::ToggleMinimize).unwrap();
        assert!(core.state().is_minimized);

        // Drag the icon: stays minimized
        press(&mut core, 1, 1);
        drag_to(&mut core, 6, 4);
        release(&mut core, 6, 4);
        assert!(core.state().is_minimized);
        assert_eq!((core.state().pos_x, core.state().pos_y), (5, 3));

        // Click the icon: restored, anchor unchanged
        press(&mut core, 5 + ICON_WIDTH / 2, 3 + ICON_HEIGHT / 2);
        release(&mut core, 5 + ICON_WIDTH / 2, 3 + ICON_HEIGHT / 2);
        assert!(!core.state().is_minimized);
        assert_eq!((core.state().pos_x, core.state().pos_y), (5, 3));
    }

    #[test]
    fn test_resize_requests_render() {
        let (mut core, _storage, _ticker) = app();
        assert!(core.take_render_request());
        assert!(!core.take_render_request());
        core.handle_resize(100, 30);
        assert_eq!(core.ui_state.viewport, (100, 30));
        assert!(core.take_render_request());
    }

    #[test]
    fn test_shutdown_leaves_running_record() {
        let (mut core, storage, ticker) = app();
        core.dispatch(WidgetAction::Start).unwrap();
        core.shutdown();
        assert_eq!(ticker.live_handles(), 0);
        assert!(load_state(&storage).unwrap().unwrap().is_running);
    }
}

//! Widget geometry shared by rendering and pointer hit testing
//!
//! Both the renderer and the input router derive positions from the same
//! `CardLayout`, so a button is clickable exactly where it is drawn.

use super::ui_state::WidgetAction;
use super::widget_state::WidgetState;

pub const CARD_WIDTH: u16 = 26;
pub const CARD_HEIGHT: u16 = 9;
pub const ICON_WIDTH: u16 = 6;
pub const ICON_HEIGHT: u16 = 3;

/// A clickable region on the card, relative to the card's top-left corner
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HitTarget {
    pub action: WidgetAction,
    pub label: &'static str,
    pub col: u16,
    pub row: u16,
    pub enabled: bool,
}

impl HitTarget {
    pub fn width(&self) -> u16 {
        self.label.chars().count() as u16
    }

    fn contains(&self, col: i32, row: i32) -> bool {
        row == self.row as i32 && col >= self.col as i32 && col < (self.col + self.width()) as i32
    }
}

/// Placement and affordances of the widget for one state snapshot
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardLayout {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
    pub minimized: bool,
    pub targets: Vec<HitTarget>,
}

impl CardLayout {
    pub fn for_state(state: &WidgetState) -> Self {
        let (width, height) = Self::size(state.is_minimized);
        let targets = if state.is_minimized {
            Vec::new()
        } else {
            vec![
                HitTarget {
                    action: WidgetAction::ToggleMinimize,
                    label: "[ _ ]",
                    col: CARD_WIDTH - 7,
                    row: 1,
                    enabled: true,
                },
                HitTarget {
                    action: WidgetAction::Start,
                    label: "[Start]",
                    col: 3,
                    row: CARD_HEIGHT - 2,
                    enabled: !state.is_running,
                },
                HitTarget {
                    action: WidgetAction::Stop,
                    label: "[Stop]",
                    col: 11,
                    row: CARD_HEIGHT - 2,
                    enabled: state.is_running,
                },
                HitTarget {
                    action: WidgetAction::Reset,
                    label: "[Reset]",
                    col: 18,
                    row: CARD_HEIGHT - 2,
                    enabled: true,
                },
            ]
        };

        Self {
            x: state.pos_x,
            y: state.pos_y,
            width,
            height,
            minimized: state.is_minimized,
            targets,
        }
    }

    /// Rendered size of the widget: full card or icon
    pub fn size(minimized: bool) -> (u16, u16) {
        if minimized {
            (ICON_WIDTH, ICON_HEIGHT)
        } else {
            (CARD_WIDTH, CARD_HEIGHT)
        }
    }

    /// Whether a screen cell falls on the widget
    pub fn contains(&self, col: u16, row: u16) -> bool {
        let (col, row) = (i64::from(col), i64::from(row));
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        col >= x && col < x + i64::from(self.width) && row >= y && row < y + i64::from(self.height)
    }

    /// Clickable target under a screen cell, if any
    pub fn target_at(&self, col: u16, row: u16) -> Option<&HitTarget> {
        if !self.contains(col, row) {
            return None;
        }
        // Inside the widget, so both offsets fit in a u16
        let rel_col = (i64::from(col) - i64::from(self.x)) as i32;
        let rel_row = (i64::from(row) - i64::from(self.y)) as i32;
        self.targets.iter().find(|t| t.contains(rel_col, rel_row))
    }
}

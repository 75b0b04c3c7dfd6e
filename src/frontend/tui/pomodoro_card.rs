use crate::data::{CardLayout, HitTarget, WidgetAction, WidgetState};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Widget},
};

const TITLE: &str = " 🍅 Pomodoro ";
const ICON: &str = "🍅";

/// The floating Pomodoro widget: full card or minimized icon
///
/// The card is drawn into its own scratch buffer and then copied onto the
/// page at `(pos_x, pos_y)`, so a card hanging off an edge is clipped rather
/// than shifted.
pub struct PomodoroCard<'a> {
    state: &'a WidgetState,
    layout: CardLayout,
}

impl<'a> PomodoroCard<'a> {
    pub fn new(state: &'a WidgetState) -> Self {
        Self {
            state,
            layout: CardLayout::for_state(state),
        }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let local = Rect::new(0, 0, self.layout.width, self.layout.height);
        let mut scratch = Buffer::empty(local);

        if self.layout.minimized {
            self.render_icon(local, &mut scratch);
        } else {
            self.render_card(local, &mut scratch);
        }

        blit(&scratch, self.layout.x, self.layout.y, area, buf);
    }

    fn body_style(&self) -> Style {
        if self.state.is_finished() {
            Style::default().bg(Color::Cyan).fg(Color::Black)
        } else {
            Style::default()
        }
    }

    fn render_icon(&self, area: Rect, buf: &mut Buffer) {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .style(self.body_style())
            .render(area, buf);

        let inner_width = area.width.saturating_sub(2);
        let x = area.x + 1 + inner_width.saturating_sub(2) / 2;
        buf.set_string(x, area.y + 1, ICON, self.body_style());
    }

    fn render_card(&self, area: Rect, buf: &mut Buffer) {
        let body = self.body_style();
        Block::bordered()
            .border_type(BorderType::Rounded)
            .title(TITLE)
            .style(body)
            .render(area, buf);

        let inner_width = area.width.saturating_sub(2);
        let separator = "─".repeat(inner_width as usize);
        buf.set_string(area.x + 1, area.y + 2, &separator, body.fg(Color::DarkGray));
        buf.set_string(
            area.x + 1,
            area.y + area.height.saturating_sub(3),
            &separator,
            body.fg(Color::DarkGray),
        );

        let time = self.state.display_time();
        let time_x = area.x + 1 + inner_width.saturating_sub(time.len() as u16) / 2;
        let time_y = area.y + area.height / 2;
        buf.set_string(time_x, time_y, &time, body.add_modifier(Modifier::BOLD));

        for target in &self.layout.targets {
            buf.set_string(
                area.x + target.col,
                area.y + target.row,
                target.label,
                button_style(target, body),
            );
        }
    }
}

fn button_style(target: &HitTarget, body: Style) -> Style {
    if !target.enabled {
        return body.fg(Color::DarkGray).add_modifier(Modifier::DIM);
    }
    let color = match target.action {
        WidgetAction::Start => Color::Blue,
        WidgetAction::Stop => Color::Red,
        _ => Color::Gray,
    };
    body.fg(color).add_modifier(Modifier::BOLD)
}

/// Copy `src` onto `dst` with its top-left at `(x, y)`, dropping cells outside `clip`
fn blit(src: &Buffer, x: i32, y: i32, clip: Rect, dst: &mut Buffer) {
    let clip = clip.intersection(dst.area);
    for row in 0..src.area.height {
        for col in 0..src.area.width {
            let tx = i64::from(x) + i64::from(col);
            let ty = i64::from(y) + i64::from(row);
            if tx < i64::from(clip.x)
                || ty < i64::from(clip.y)
                || tx >= i64::from(clip.right())
                || ty >= i64::from(clip.bottom())
            {
                continue;
            }
            if let (Some(cell), Some(target)) = (
                src.cell((src.area.x + col, src.area.y + row)),
                dst.cell_mut((tx as u16, ty as u16)),
            ) {
                *target = cell.clone();
            }
        }
    }
}

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::ui::theme::Theme;
use crate::vocab::{FilterMode, VocabState};

pub struct FilterTabs<'a> {
    state: &'a VocabState,
    theme: &'a Theme,
}

impl<'a> FilterTabs<'a> {
    pub fn new(state: &'a VocabState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl Widget for FilterTabs<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let colors = &self.theme.colors;
        let active = self.state.filter_mode();

        let mut spans = vec![Span::raw(" ")];
        for (i, mode) in FilterMode::ALL_MODES.iter().enumerate() {
            let label = format!(
                " [{}] {} ({}) ",
                i + 1,
                mode.label(),
                self.state.mode_count(*mode)
            );
            let style = if *mode == active {
                Style::default()
                    .fg(colors.bg())
                    .bg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.muted())
            };
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

const PLACEHOLDER: &str = "Search word or meaning…";

/// Bordered query box. The cursor is drawn only while focused.
pub struct SearchBar<'a> {
    input: &'a LineInput,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> SearchBar<'a> {
    pub fn new(input: &'a LineInput, focused: bool, theme: &'a Theme) -> Self {
        Self {
            input,
            focused,
            theme,
        }
    }
}

impl Widget for SearchBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let border = if self.focused {
            colors.border_focused()
        } else {
            colors.border()
        };
        let block = Block::bordered()
            .title(" Search ")
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        block.render(area, buf);

        let text_style = Style::default().fg(colors.fg());
        let cursor_style = Style::default().fg(colors.bg()).bg(colors.accent());

        let mut spans = vec![Span::styled(" / ", Style::default().fg(colors.accent()))];
        if self.input.is_empty() && !self.focused {
            spans.push(Span::styled(
                PLACEHOLDER,
                Style::default()
                    .fg(colors.muted())
                    .add_modifier(Modifier::ITALIC),
            ));
        } else if self.focused {
            let (before, cursor, after) = self.input.render_parts();
            spans.push(Span::styled(before.to_string(), text_style));
            match cursor {
                Some(ch) => {
                    spans.push(Span::styled(ch.to_string(), cursor_style));
                    spans.push(Span::styled(after.to_string(), text_style));
                }
                None => spans.push(Span::styled(" ", cursor_style)),
            }
        } else {
            spans.push(Span::styled(self.input.value().to_string(), text_style));
        }

        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_row(input: &LineInput, focused: bool) -> String {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 40, 3);
        let mut buf = Buffer::empty(area);
        SearchBar::new(input, focused, &theme).render(area, &mut buf);
        (0..area.width).map(|x| buf[(x, 1)].symbol()).collect()
    }

    #[test]
    fn placeholder_when_idle_and_empty() {
        let input = LineInput::new("");
        assert!(render_row(&input, false).contains("Search word or meaning"));
        assert!(!render_row(&input, true).contains("Search word or meaning"));
    }

    #[test]
    fn shows_query_text() {
        let input = LineInput::new("zeal");
        assert!(render_row(&input, false).contains("/ zeal"));
        assert!(render_row(&input, true).contains("/ zeal"));
    }
}

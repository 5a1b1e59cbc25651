use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;
use crate::vocab::VocabRecord;

/// Full card for the selected word, including its example sentence.
pub struct WordDetail<'a> {
    record: Option<&'a VocabRecord>,
    learned: bool,
    speech_available: bool,
    theme: &'a Theme,
}

impl<'a> WordDetail<'a> {
    pub fn new(record: Option<&'a VocabRecord>, learned: bool, theme: &'a Theme) -> Self {
        Self {
            record,
            learned,
            speech_available: true,
            theme,
        }
    }

    pub fn speech_available(mut self, available: bool) -> Self {
        self.speech_available = available;
        self
    }
}

impl Widget for WordDetail<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Detail ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(record) = self.record else {
            Paragraph::new(Line::from(Span::styled(
                " Select a word to see its example.",
                Style::default().fg(colors.muted()),
            )))
            .render(inner, buf);
            return;
        };

        let status = if self.learned {
            Span::styled("  ✓ learned", Style::default().fg(colors.learned()))
        } else {
            Span::styled("  not learned", Style::default().fg(colors.muted()))
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled(
                    format!(" {}", record.word),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                status,
            ]),
            Line::from(Span::styled(
                format!(" {}", record.japanese_meaning),
                Style::default().fg(colors.meaning()),
            )),
            Line::from(""),
        ];

        if record.example_sentence.trim().is_empty() {
            lines.push(Line::from(Span::styled(
                " (no example sentence)",
                Style::default()
                    .fg(colors.muted())
                    .add_modifier(Modifier::ITALIC),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                format!(" {}", record.example_sentence),
                Style::default().fg(colors.fg()),
            )));
        }

        if self.speech_available {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                " [s] Speak sentence  [w] Speak word",
                Style::default().fg(colors.muted()),
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_text(detail: WordDetail<'_>) -> String {
        let area = Rect::new(0, 0, 50, 10);
        let mut buf = Buffer::empty(area);
        detail.render(area, &mut buf);
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn shows_word_meaning_and_example() {
        let theme = Theme::default();
        let record = VocabRecord::new("zeal", "熱意", "His zeal impressed us.");
        let text = render_text(WordDetail::new(Some(&record), true, &theme));
        assert!(text.contains("zeal"));
        assert!(text.contains("✓ learned"));
        assert!(text.contains("His zeal impressed us."));
        assert!(text.contains("[s] Speak sentence"));
    }

    #[test]
    fn hides_speak_hint_without_backend() {
        let theme = Theme::default();
        let record = VocabRecord::new("zeal", "熱意", "");
        let text = render_text(WordDetail::new(Some(&record), false, &theme).speech_available(false));
        assert!(text.contains("(no example sentence)"));
        assert!(!text.contains("Speak"));
    }

    #[test]
    fn placeholder_without_selection() {
        let theme = Theme::default();
        let text = render_text(WordDetail::new(None, false, &theme));
        assert!(text.contains("Select a word"));
    }
}

use std::cell::Cell;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;
use crate::vocab::{VocabRecord, VocabState};

/// The filtered word list with the current selection highlighted.
pub struct WordList<'a> {
    state: &'a VocabState,
    visible: &'a [&'a VocabRecord],
    selected: usize,
    offset: &'a Cell<usize>,
    loading: bool,
    theme: &'a Theme,
}

impl<'a> WordList<'a> {
    pub fn new(
        state: &'a VocabState,
        visible: &'a [&'a VocabRecord],
        selected: usize,
        offset: &'a Cell<usize>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            state,
            visible,
            selected,
            offset,
            loading: false,
            theme,
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    fn empty_message(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        if self.loading {
            vec![Line::from(Span::styled(
                "Loading word list…",
                Style::default().fg(colors.muted()),
            ))]
        } else if self.state.records().is_empty() {
            vec![
                Line::from(Span::styled(
                    "No words loaded.",
                    Style::default().fg(colors.fg()),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press [o] to open a CSV or JSON word list",
                    Style::default().fg(colors.muted()),
                )),
                Line::from(Span::styled(
                    "with columns Word, JapaneseMeaning, ExampleSentence.",
                    Style::default().fg(colors.muted()),
                )),
            ]
        } else {
            vec![Line::from(Span::styled(
                "No matches found.",
                Style::default().fg(colors.muted()),
            ))]
        }
    }
}

/// First visible row so that `selected` stays on screen, moving as little
/// as possible from `prev`.
pub fn scroll_offset(prev: usize, selected: usize, height: usize, len: usize) -> usize {
    if height == 0 || len == 0 {
        return 0;
    }
    let max_offset = len.saturating_sub(height);
    let mut offset = prev.min(max_offset);
    if selected < offset {
        offset = selected;
    } else if selected >= offset + height {
        offset = selected + 1 - height;
    }
    offset
}

impl Widget for WordList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" Words ({}) ", self.visible.len()))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.visible.is_empty() {
            let top = inner.y + inner.height / 3;
            let message_area = Rect::new(inner.x, top, inner.width, inner.bottom() - top);
            Paragraph::new(self.empty_message())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(message_area, buf);
            return;
        }

        let height = inner.height as usize;
        let offset = scroll_offset(self.offset.get(), self.selected, height, self.visible.len());
        self.offset.set(offset);

        let word_width = self
            .visible
            .iter()
            .map(|r| r.word.chars().count())
            .max()
            .unwrap_or(0)
            .min(inner.width as usize / 2);

        for (row, record) in self.visible.iter().skip(offset).take(height).enumerate() {
            let idx = offset + row;
            let is_selected = idx == self.selected;
            let learned = self.state.is_learned(&record.word);

            let base = if is_selected {
                Style::default().fg(colors.selection_fg()).bg(colors.selection_bg())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bg())
            };
            let marker = if learned { " ✓ " } else { "   " };
            let word = format!("{:<word_width$}", record.word);

            let line = Line::from(vec![
                Span::styled(marker, base.fg(colors.learned())),
                Span::styled(
                    word,
                    if is_selected {
                        base.add_modifier(Modifier::BOLD)
                    } else {
                        base
                    },
                ),
                Span::styled("  ", base),
                Span::styled(record.japanese_meaning.as_str(), base.fg(colors.meaning())),
            ]);

            let y = inner.y + row as u16;
            buf.set_style(Rect::new(inner.x, y, inner.width, 1), base);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

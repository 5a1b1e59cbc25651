use std::path::MAIN_SEPARATOR;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    /// Text unchanged; caller may ignore.
    Continue,
    Changed,
    Submit,
    Cancel,
}

/// Cycling state while Tab is pressed repeatedly.
struct Completion {
    candidates: Vec<String>,
    index: usize,
}

/// Single-line editor with readline-style shortcuts.
pub struct LineInput {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
    path_completion: bool,
    completion: Option<Completion>,
    pub completion_error: bool,
}

impl LineInput {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
            path_completion: false,
            completion: None,
            completion_error: false,
        }
    }

    /// Tab completes directories and word-list files (.csv, .json).
    pub fn with_path_completion(mut self) -> Self {
        self.path_completion = true;
        self
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn set_value(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.len();
        self.reset_completion();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled rendering.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let at = self.byte_at(self.cursor);
        match self.text[at..].chars().next() {
            Some(ch) => (&self.text[..at], Some(ch), &self.text[at + ch.len_utf8()..]),
            None => (&self.text, None, ""),
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if !matches!(key.code, KeyCode::Tab | KeyCode::BackTab) {
            self.reset_completion();
        }

        match key.code {
            KeyCode::Esc => InputResult::Cancel,
            KeyCode::Enter => InputResult::Submit,
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                InputResult::Continue
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.len());
                InputResult::Continue
            }
            KeyCode::Home => {
                self.cursor = 0;
                InputResult::Continue
            }
            KeyCode::End => {
                self.cursor = self.len();
                InputResult::Continue
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.remove_at(self.cursor);
                InputResult::Changed
            }
            KeyCode::Delete if self.cursor < self.len() => {
                self.remove_at(self.cursor);
                InputResult::Changed
            }
            KeyCode::Tab if self.path_completion => self.complete(true),
            KeyCode::BackTab if self.path_completion => self.complete(false),
            KeyCode::Char('a') if ctrl => {
                self.cursor = 0;
                InputResult::Continue
            }
            KeyCode::Char('e') if ctrl => {
                self.cursor = self.len();
                InputResult::Continue
            }
            KeyCode::Char('u') if ctrl => {
                self.text.clear();
                self.cursor = 0;
                InputResult::Changed
            }
            KeyCode::Char('w') if ctrl => {
                self.delete_word_back();
                InputResult::Changed
            }
            KeyCode::Char(ch) if !ctrl => {
                let at = self.byte_at(self.cursor);
                self.text.insert(at, ch);
                self.cursor += 1;
                InputResult::Changed
            }
            _ => InputResult::Continue,
        }
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    fn remove_at(&mut self, char_idx: usize) {
        let at = self.byte_at(char_idx);
        if let Some(ch) = self.text[at..].chars().next() {
            self.text.replace_range(at..at + ch.len_utf8(), "");
        }
    }

    /// Unix word rubout: skip whitespace, then the word before it.
    fn delete_word_back(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut pos = self.cursor;
        while pos > 0 && chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        let (start, end) = (self.byte_at(pos), self.byte_at(self.cursor));
        self.text.replace_range(start..end, "");
        self.cursor = pos;
    }

    fn reset_completion(&mut self) {
        self.completion = None;
        self.completion_error = false;
    }

    fn complete(&mut self, forward: bool) -> InputResult {
        if self.cursor < self.len() {
            return InputResult::Continue;
        }

        let index = match self.completion.as_mut() {
            Some(state) => {
                let count = state.candidates.len();
                state.index = if forward {
                    (state.index + 1) % count
                } else {
                    (state.index + count - 1) % count
                };
                state.index
            }
            None => {
                let candidates = match path_candidates(&self.text) {
                    Ok(c) if !c.is_empty() => c,
                    Ok(_) => return InputResult::Continue,
                    Err(_) => {
                        self.completion_error = true;
                        return InputResult::Continue;
                    }
                };
                self.completion = Some(Completion {
                    candidates,
                    index: 0,
                });
                0
            }
        };

        if let Some(state) = self.completion.as_ref() {
            self.text = state.candidates[index].clone();
            self.cursor = self.len();
        }
        InputResult::Changed
    }
}

const MAX_CANDIDATES: usize = 100;

/// Entries of the directory named by `seed` that start with its last
/// component, directories first.
fn path_candidates(seed: &str) -> std::io::Result<Vec<String>> {
    let split = seed.rfind(['/', '\\']).map(|i| i + 1).unwrap_or(0);
    let (dir_part, partial) = seed.split_at(split);

    let read_dir = match dir_part {
        "" => ".".to_string(),
        d if d.starts_with('~') => match dirs::home_dir() {
            Some(home) => format!("{}{}", home.display(), &d[1..]),
            None => d.to_string(),
        },
        d => d.to_string(),
    };

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(read_dir)? {
        let entry = entry?;
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        entries.push((entry.file_name().to_string_lossy().to_string(), is_dir));
    }
    Ok(rank_candidates(entries, dir_part, partial))
}

fn rank_candidates(entries: Vec<(String, bool)>, dir_part: &str, partial: &str) -> Vec<String> {
    let show_hidden = partial.starts_with('.');
    let mut ranked: Vec<(bool, String)> = entries
        .into_iter()
        .filter(|(name, _)| name.starts_with(partial))
        .filter(|(name, _)| show_hidden || !name.starts_with('.'))
        .filter(|(name, is_dir)| *is_dir || is_word_list(name))
        .map(|(name, is_dir)| {
            let full = if is_dir {
                format!("{dir_part}{name}{MAIN_SEPARATOR}")
            } else {
                format!("{dir_part}{name}")
            };
            (!is_dir, full)
        })
        .collect();
    ranked.sort();
    ranked.truncate(MAX_CANDIDATES);
    ranked.into_iter().map(|(_, path)| path).collect()
}

fn is_word_list(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".csv") || lower.ends_with(".json")
}

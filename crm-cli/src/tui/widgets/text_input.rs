use crossterm::event::KeyCode;

/// Cursor state for single-line text inputs
///
/// The value itself is owned by the caller; `handle_key` returns the new value
/// when the key changed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInputState {
    /// Cursor position in chars
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor_to_end(&mut self, value: &str) {
        self.cursor = value.chars().count();
    }

    /// Apply an editing key. Returns Some(new_value) when the text changed.
    pub fn handle_key(&mut self, key: KeyCode, value: &str, max_length: Option<usize>) -> Option<String> {
        let mut chars: Vec<char> = value.chars().collect();
        self.cursor = self.cursor.min(chars.len());

        match key {
            KeyCode::Char(c) => {
                if max_length.is_some_and(|max| chars.len() >= max) {
                    return None;
                }
                chars.insert(self.cursor, c);
                self.cursor += 1;
                Some(chars.into_iter().collect())
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                self.cursor -= 1;
                chars.remove(self.cursor);
                Some(chars.into_iter().collect())
            }
            KeyCode::Delete => {
                if self.cursor >= chars.len() {
                    return None;
                }
                chars.remove(self.cursor);
                Some(chars.into_iter().collect())
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(chars.len());
                None
            }
            KeyCode::Home => {
                self.cursor = 0;
                None
            }
            KeyCode::End => {
                self.cursor = chars.len();
                None
            }
            _ => None,
        }
    }
}

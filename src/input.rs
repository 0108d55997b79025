/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Single-line text input with a cursor measured in characters
#[derive(Debug, Clone, Default)]
pub struct InputField {
    value: String,
    cursor: usize,
}

impl InputField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.value, self.cursor);
        self.value.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.value, self.cursor);
            self.value.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let byte_pos = char_to_byte_index(&self.value, self.cursor);
            self.value.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// Visible slice and cursor column for a box `width` characters wide.
    ///
    /// Scrolls horizontally so the cursor always stays inside the box.
    pub fn visible(&self, width: usize) -> (String, usize) {
        let scroll_offset = if width == 0 || self.cursor < width {
            0
        } else {
            self.cursor - width + 1
        };
        let text = self.value.chars().skip(scroll_offset).take(width).collect();
        (text, self.cursor - scroll_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing_around_multibyte_chars() {
        let mut input = InputField::new();
        for c in "héllo".chars() {
            input.insert(c);
        }
        input.move_left();
        input.move_left();
        input.move_left();
        input.backspace(); // removes 'é'
        assert_eq!(input.value(), "hllo");
        assert_eq!(input.cursor(), 1);

        input.insert('ü');
        input.move_home();
        input.delete();
        assert_eq!(input.value(), "üllo");

        input.move_end();
        input.delete();
        assert_eq!(input.value(), "üllo");
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn test_visible_window_follows_cursor() {
        let mut input = InputField::new();
        input.set_value("abcdefghij");
        let (text, col) = input.visible(4);
        assert_eq!(text, "hij");
        assert_eq!(col, 3);

        input.move_home();
        let (text, col) = input.visible(4);
        assert_eq!(text, "abcd");
        assert_eq!(col, 0);
    }

    #[test]
    fn test_clear_resets_cursor() {
        let mut input = InputField::new();
        input.set_value("  hi  ");
        input.clear();
        assert_eq!(input.value(), "");
        assert_eq!(input.cursor(), 0);
    }
}

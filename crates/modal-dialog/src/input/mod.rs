#[derive(Debug, Default, Clone)]
pub struct InputState {
    pub buffer: Vec<char>,
    pub cursor: usize,
}

impl InputState {
    pub fn current(&self) -> String {
        self.buffer.iter().collect()
    }

    pub fn set_from(&mut self, value: &str) {
        self.buffer = value.chars().collect();
        self.cursor = self.buffer.len();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            return;
        }
        self.buffer.insert(self.cursor, ch);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, value: &str) {
        for ch in value.chars() {
            self.insert_char(ch);
        }
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.buffer.remove(self.cursor);
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.buffer.len() {
            return false;
        }
        self.buffer.remove(self.cursor);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.buffer.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.buffer.len();
    }

    pub fn kill_to_end(&mut self) -> bool {
        if self.cursor >= self.buffer.len() {
            return false;
        }
        self.buffer.truncate(self.cursor);
        true
    }

    pub fn delete_word_back(&mut self) -> bool {
        let start = self.cursor;
        while self.cursor > 0 && self.buffer[self.cursor - 1].is_whitespace() {
            self.cursor -= 1;
            self.buffer.remove(self.cursor);
        }
        while self.cursor > 0 && !self.buffer[self.cursor - 1].is_whitespace() {
            self.cursor -= 1;
            self.buffer.remove(self.cursor);
        }
        self.cursor != start
    }
}

#[cfg(test)]
mod tests {
    use super::InputState;

    #[test]
    fn insert_and_edit_at_cursor() {
        let mut input = InputState::default();
        input.insert_str("helo");
        input.move_left();
        input.insert_char('l');
        assert_eq!(input.current(), "hello");
        assert_eq!(input.cursor, 4);

        input.move_home();
        assert!(input.delete());
        assert_eq!(input.current(), "ello");
        assert!(!input.backspace());
    }

    #[test]
    fn set_from_keeps_value_verbatim_and_moves_cursor_to_end() {
        let mut input = InputState::default();
        input.set_from("a\nb");
        assert_eq!(input.current(), "a\nb");
        assert_eq!(input.cursor, 3);
        input.insert_char('\n');
        assert_eq!(input.current(), "a\nb");
    }

    #[test]
    fn delete_word_back_removes_trailing_space_and_word() {
        let mut input = InputState::default();
        input.set_from("my preset  ");
        assert!(input.delete_word_back());
        assert_eq!(input.current(), "my ");
        input.move_home();
        assert!(!input.delete_word_back());
    }

    #[test]
    fn kill_to_end_truncates_after_cursor() {
        let mut input = InputState::default();
        input.set_from("keep drop");
        input.cursor = 4;
        assert!(input.kill_to_end());
        assert_eq!(input.current(), "keep");
        assert!(!input.kill_to_end());
    }
}

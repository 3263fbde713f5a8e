use ratatui::layout::Rect;

/// Text buffer behind a form field. Single-line fields never receive
/// newlines; the description field does.
#[derive(Debug, Clone)]
pub struct Editor {
    pub lines: Vec<String>,
    pub cursor_line: usize,
    pub cursor_col: usize, // in chars, not bytes
    pub scroll_offset: usize,
    pub scroll_col: usize,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_line: 0,
            cursor_col: 0,
            scroll_offset: 0,
            scroll_col: 0,
        }
    }

    /// Editor holding `content` with the cursor at its end
    pub fn from_string(content: &str) -> Self {
        let mut lines: Vec<String> = content.split('\n').map(|s| s.to_string()).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        let cursor_line = lines.len() - 1;
        let cursor_col = lines[cursor_line].chars().count();
        Self {
            lines,
            cursor_line,
            cursor_col,
            scroll_offset: 0,
            scroll_col: 0,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map(|l| l.chars().count()).unwrap_or(0)
    }

    fn byte_index(line: &str, col: usize) -> usize {
        line.char_indices().nth(col).map(|(i, _)| i).unwrap_or(line.len())
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.insert_newline();
            return;
        }
        let col = self.cursor_col.min(self.line_len(self.cursor_line));
        if let Some(line) = self.lines.get_mut(self.cursor_line) {
            let at = Self::byte_index(line, col);
            line.insert(at, ch);
            self.cursor_col = col + 1;
        }
    }

    pub fn insert_newline(&mut self) {
        let col = self.cursor_col.min(self.line_len(self.cursor_line));
        if let Some(line) = self.lines.get_mut(self.cursor_line) {
            let at = Self::byte_index(line, col);
            let rest = line.split_off(at);
            self.lines.insert(self.cursor_line + 1, rest);
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    /// Backspace: delete before the cursor, joining lines at column 0
    pub fn delete_char(&mut self) {
        let col = self.cursor_col.min(self.line_len(self.cursor_line));
        if col > 0 {
            if let Some(line) = self.lines.get_mut(self.cursor_line) {
                let at = Self::byte_index(line, col - 1);
                line.remove(at);
                self.cursor_col = col - 1;
            }
        } else if self.cursor_line > 0 {
            let current = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_col = self.line_len(self.cursor_line);
            self.lines[self.cursor_line].push_str(&current);
        }
    }

    /// Delete key: delete under the cursor
    pub fn delete_forward(&mut self) {
        let len = self.line_len(self.cursor_line);
        if self.cursor_col < len {
            if let Some(line) = self.lines.get_mut(self.cursor_line) {
                let at = Self::byte_index(line, self.cursor_col);
                line.remove(at);
            }
        } else if self.cursor_line + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_line + 1);
            self.lines[self.cursor_line].push_str(&next);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.line_len(self.cursor_line);
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_col < self.line_len(self.cursor_line) {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_cursor_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.cursor_col.min(self.line_len(self.cursor_line));
        }
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = self.cursor_col.min(self.line_len(self.cursor_line));
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_col = self.line_len(self.cursor_line);
    }

    /// Keep the cursor inside a `height` x `width` viewport
    pub fn update_scroll(&mut self, height: usize, width: usize) {
        if height > 0 {
            if self.cursor_line < self.scroll_offset {
                self.scroll_offset = self.cursor_line;
            } else if self.cursor_line >= self.scroll_offset + height {
                self.scroll_offset = self.cursor_line + 1 - height;
            }
        }
        if width > 0 {
            if self.cursor_col < self.scroll_col {
                self.scroll_col = self.cursor_col;
            } else if self.cursor_col >= self.scroll_col + width {
                self.scroll_col = self.cursor_col + 1 - width;
            }
        }
    }

    /// Lines currently inside the viewport, clipped horizontally
    pub fn visible_lines(&self, height: usize, width: usize) -> Vec<String> {
        self.lines
            .iter()
            .skip(self.scroll_offset)
            .take(height)
            .map(|l| l.chars().skip(self.scroll_col).take(width).collect())
            .collect()
    }

    /// Terminal position of the cursor inside `area` (the field's inner area)
    pub fn cursor_screen_pos(&self, area: Rect) -> Option<(u16, u16)> {
        let row = self.cursor_line.checked_sub(self.scroll_offset)?;
        let col = self.cursor_col.checked_sub(self.scroll_col)?;
        if row >= area.height as usize || col >= area.width as usize {
            return None;
        }
        Some((area.x + col as u16, area.y + row as u16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_multibyte_text() {
        let mut editor = Editor::from_string("Reunião");
        editor.delete_char();
        editor.insert_char('ã');
        editor.insert_char('o');
        assert_eq!(editor.text(), "Reuniãão");
        editor.move_cursor_home();
        editor.delete_forward();
        assert_eq!(editor.text(), "euniãão");
    }

    #[test]
    fn newline_split_and_backspace_join() {
        let mut editor = Editor::from_string("ab");
        editor.move_cursor_left();
        editor.insert_newline();
        assert_eq!(editor.lines, vec!["a", "b"]);
        assert_eq!((editor.cursor_line, editor.cursor_col), (1, 0));
        editor.delete_char();
        assert_eq!(editor.text(), "ab");
        assert_eq!((editor.cursor_line, editor.cursor_col), (0, 1));
    }

    #[test]
    fn scroll_follows_cursor() {
        let mut editor = Editor::from_string("0123456789");
        editor.update_scroll(1, 4);
        assert_eq!(editor.scroll_col, 7);
        assert_eq!(editor.visible_lines(1, 4), vec!["789"]);
        let area = Rect::new(10, 5, 4, 1);
        assert_eq!(editor.cursor_screen_pos(area), Some((13, 5)));
    }
}

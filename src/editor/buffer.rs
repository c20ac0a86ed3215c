use ropey::Rope;

/// Cursor position. Columns count chars, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
    /// Column to return to when moving vertically past shorter lines.
    goal: usize,
}

impl Cursor {
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            goal: col,
        }
    }

    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.goal = col;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::at(0, 0)
    }
}

/// Cursor motions understood by [`EditorBuffer::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    WordLeft,
    WordRight,
    BufferStart,
    BufferEnd,
    PageUp(usize),
    PageDown(usize),
}

/// The editor pane's text.
///
/// Every mutation bumps [`EditorBuffer::revision`], which the controller
/// uses to tell when the document needs to be re-read and persisted.
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    revision: u64,
}

impl EditorBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::default(),
            revision: 0,
        }
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line content without its line terminator.
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(idx);
        let end = self.line_chars(idx);
        Some(line.slice(..end).to_string())
    }

    /// Number of chars on a line, excluding its line break. `\r\n` and
    /// every single-char break the rope splits on are excluded.
    pub fn line_chars(&self, idx: usize) -> usize {
        if idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(idx);
        let mut len = line.len_chars();
        if len > 0 && is_line_break(line.char(len - 1)) {
            let last = line.char(len - 1);
            len -= 1;
            if last == '\n' && len > 0 && line.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        len
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Swap in new content and put the cursor back at the top.
    pub fn replace_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.cursor = Cursor::default();
        self.revision += 1;
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.newline();
            return;
        }
        self.rope.insert_char(self.char_idx(), ch);
        self.cursor.set_col(self.cursor.col + 1);
        self.revision += 1;
    }

    /// Insert `text` at the cursor, leaving the cursor after it.
    pub fn insert_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let at = self.char_idx();
        self.rope.insert(at, text);
        let end = at + text.chars().count();
        self.cursor = self.cursor_for(end);
        self.revision += 1;
    }

    pub fn newline(&mut self) {
        self.rope.insert_char(self.char_idx(), '\n');
        self.cursor.line += 1;
        self.cursor.set_col(0);
        self.revision += 1;
    }

    /// Remove the char before the cursor, joining lines at column 0.
    pub fn backspace(&mut self) -> bool {
        let at = self.char_idx();
        if at == 0 {
            return false;
        }
        let mut start = at - 1;
        if self.rope.char(start) == '\n' && start > 0 && self.rope.char(start - 1) == '\r' {
            start -= 1;
        }
        self.rope.remove(start..at);
        self.cursor = self.cursor_for(start);
        self.revision += 1;
        true
    }

    /// Remove the char under the cursor, joining lines at line end.
    pub fn delete(&mut self) -> bool {
        let at = self.char_idx();
        let total = self.rope.len_chars();
        if at >= total {
            return false;
        }
        let mut end = at + 1;
        if self.rope.char(at) == '\r' && end < total && self.rope.char(end) == '\n' {
            end += 1;
        }
        self.rope.remove(at..end);
        self.revision += 1;
        true
    }

    pub fn apply(&mut self, motion: Motion) {
        match motion {
            Motion::Left => self.left(),
            Motion::Right => self.right(),
            Motion::Up => self.vertical(-1),
            Motion::Down => self.vertical(1),
            Motion::PageUp(rows) => self.vertical(-isize::try_from(rows).unwrap_or(isize::MAX)),
            Motion::PageDown(rows) => self.vertical(isize::try_from(rows).unwrap_or(isize::MAX)),
            Motion::LineStart => self.cursor.set_col(0),
            Motion::LineEnd => self.cursor.set_col(self.line_chars(self.cursor.line)),
            Motion::WordLeft => self.word_left(),
            Motion::WordRight => self.word_right(),
            Motion::BufferStart => self.cursor = Cursor::default(),
            Motion::BufferEnd => {
                let last = self.line_count().saturating_sub(1);
                self.cursor = Cursor::at(last, self.line_chars(last));
            }
        }
    }

    /// Place the cursor, clamping to the buffer.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let line = line.min(self.line_count().saturating_sub(1));
        self.cursor = Cursor::at(line, col.min(self.line_chars(line)));
    }

    fn char_idx(&self) -> usize {
        self.rope.line_to_char(self.cursor.line) + self.cursor.col.min(self.line_chars(self.cursor.line))
    }

    fn cursor_for(&self, char_idx: usize) -> Cursor {
        let line = self.rope.char_to_line(char_idx);
        Cursor::at(line, char_idx - self.rope.line_to_char(line))
    }

    fn left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.set_col(self.cursor.col - 1);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.set_col(self.line_chars(self.cursor.line));
        }
    }

    fn right(&mut self) {
        if self.cursor.col < self.line_chars(self.cursor.line) {
            self.cursor.set_col(self.cursor.col + 1);
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        }
    }

    fn vertical(&mut self, delta: isize) {
        let last = self.line_count().saturating_sub(1);
        let line = self.cursor.line.saturating_add_signed(delta).min(last);
        self.cursor.line = line;
        self.cursor.col = self.cursor.goal.min(self.line_chars(line));
    }

    fn word_left(&mut self) {
        if self.cursor.col == 0 {
            self.left();
            return;
        }
        let chars: Vec<char> = self.rope.line(self.cursor.line).chars().take(self.cursor.col).collect();
        let mut col = chars.len();
        while col > 0 && !is_word_char(chars[col - 1]) {
            col -= 1;
        }
        while col > 0 && is_word_char(chars[col - 1]) {
            col -= 1;
        }
        self.cursor.set_col(col);
    }

    fn word_right(&mut self) {
        let len = self.line_chars(self.cursor.line);
        if self.cursor.col >= len {
            self.right();
            return;
        }
        let chars: Vec<char> = self.rope.line(self.cursor.line).chars().take(len).collect();
        let mut col = self.cursor.col;
        while col < len && is_word_char(chars[col]) {
            col += 1;
        }
        while col < len && !is_word_char(chars[col]) {
            col += 1;
        }
        self.cursor.set_col(col);
    }
}

/// Chars ropey treats as ending a line.
const fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field("lines", &self.rope.len_lines())
            .field("cursor", &self.cursor)
            .field("revision", &self.revision)
            .finish()
    }
}

use std::ops::Range;

use ropey::Rope;

/// Caret position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column (byte offset within the line).
    pub col: usize,
}

impl Cursor {
    pub const fn at(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Direction for caret movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A rope-backed text buffer with a caret and an optional selection anchor.
///
/// Positions are exposed both as `(line, col)` [`Cursor`]s and as byte
/// offsets into the whole text; the keystroke rules work on the latter.
/// Lines are separated by `\n` only, so `line_count` always equals the
/// number of `\n`-separated segments of [`text`](Self::text).
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    anchor: Option<Cursor>,
    /// Sticky column for vertical movement.
    goal_col: usize,
    dirty: bool,
}

impl EditorBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::default(),
            anchor: None,
            goal_col: 0,
            dirty: false,
        }
    }

    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The caret position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// Get the content of a line (without the trailing `\n`).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let mut s = self.rope.line(line_idx).to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        Some(s)
    }

    /// Length of a line in bytes (without the trailing `\n`).
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.len())
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    // --- Offsets and selection ---

    /// Byte offset of `cursor` within the whole text.
    pub fn offset_of(&self, cursor: Cursor) -> usize {
        let line = cursor.line.min(self.line_count().saturating_sub(1));
        self.rope.line_to_byte(line) + cursor.col.min(self.line_len(line))
    }

    /// The position of a byte offset, clamped to the text and snapped back
    /// to a character boundary.
    pub fn cursor_at(&self, offset: usize) -> Cursor {
        let offset = offset.min(self.rope.len_bytes());
        let line = self.rope.byte_to_line(offset);
        let text = self.line_at(line).unwrap_or_default();
        let mut col = (offset - self.rope.line_to_byte(line)).min(text.len());
        while !text.is_char_boundary(col) {
            col -= 1;
        }
        Cursor::at(line, col)
    }

    /// Byte offset of the caret.
    pub fn caret_offset(&self) -> usize {
        self.offset_of(self.cursor)
    }

    /// The selected byte range; empty and positioned at the caret when
    /// nothing is selected.
    pub fn selection(&self) -> Range<usize> {
        let head = self.caret_offset();
        let anchor = self.anchor.map_or(head, |a| self.offset_of(a));
        head.min(anchor)..head.max(anchor)
    }

    pub fn has_selection(&self) -> bool {
        !self.selection().is_empty()
    }

    pub fn select_all(&mut self) {
        self.anchor = Some(Cursor::default());
        self.move_to_end(true);
    }

    /// Select from byte offset `anchor` to byte offset `head`.
    pub fn set_selection(&mut self, anchor: usize, head: usize) {
        self.anchor = Some(self.cursor_at(anchor));
        self.set_cursor(self.cursor_at(head));
    }

    // --- Editing ---

    /// Replace the whole text and place the caret at byte offset `caret`.
    pub fn replace(&mut self, text: &str, caret: usize) {
        if self.rope != text {
            self.rope = Rope::from_str(text);
            self.dirty = true;
        }
        self.anchor = None;
        self.set_cursor(self.cursor_at(caret));
    }

    /// Insert a character, replacing any selection.
    pub fn insert_char(&mut self, ch: char) {
        let mut tmp = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut tmp));
    }

    /// Insert a string, replacing any selection.
    pub fn insert_str(&mut self, s: &str) {
        let range = self.selection();
        if s.is_empty() && range.is_empty() {
            return;
        }
        self.remove_bytes(range.clone());
        let char_idx = self.rope.byte_to_char(range.start);
        self.rope.insert(char_idx, s);
        self.dirty = true;
        self.anchor = None;
        self.set_cursor(self.cursor_at(range.start + s.len()));
    }

    /// Delete the selection, or the character before the caret (Backspace).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let end = self.caret_offset();
        if end == 0 {
            return false;
        }
        let char_idx = self.rope.byte_to_char(end);
        let start = self.rope.char_to_byte(char_idx - 1);
        self.remove_bytes(start..end);
        self.dirty = true;
        self.set_cursor(self.cursor_at(start));
        true
    }

    /// Delete the selection, or the character at the caret (Delete).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let start = self.caret_offset();
        if start >= self.rope.len_bytes() {
            return false;
        }
        let char_idx = self.rope.byte_to_char(start);
        let end = self.rope.char_to_byte(char_idx + 1);
        self.remove_bytes(start..end);
        self.dirty = true;
        true
    }

    // --- Movement ---

    /// Move the caret; `extend` grows the selection instead of clearing it.
    pub fn move_cursor(&mut self, direction: Direction, extend: bool) {
        if !extend && self.has_selection() && matches!(direction, Direction::Left | Direction::Right) {
            let range = self.selection();
            let edge = if direction == Direction::Left { range.start } else { range.end };
            self.anchor = None;
            self.set_cursor(self.cursor_at(edge));
            return;
        }
        self.begin_motion(extend);
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_vertical(-1),
            Direction::Down => self.move_vertical(1),
        }
    }

    /// Move the caret up (negative) or down by `lines`, keeping the column.
    pub fn move_lines(&mut self, lines: isize, extend: bool) {
        self.begin_motion(extend);
        self.move_vertical(lines);
    }

    pub fn move_home(&mut self, extend: bool) {
        self.begin_motion(extend);
        self.set_cursor(Cursor::at(self.cursor.line, 0));
    }

    pub fn move_end(&mut self, extend: bool) {
        self.begin_motion(extend);
        let line = self.cursor.line;
        self.set_cursor(Cursor::at(line, self.line_len(line)));
    }

    /// Move one word to the left (Ctrl+Left).
    pub fn move_word_left(&mut self, extend: bool) {
        self.begin_motion(extend);
        let Cursor { line, col } = self.cursor;
        if col == 0 {
            if line > 0 {
                self.set_cursor(Cursor::at(line - 1, self.line_len(line - 1)));
            }
            return;
        }

        let text = self.line_at(line).unwrap_or_default();
        let trimmed = text[..col].trim_end();
        let pos = trimmed
            .char_indices()
            .rev()
            .find(|&(_, c)| !is_word_char(c))
            .map_or(0, |(i, c)| i + c.len_utf8());
        self.set_cursor(Cursor::at(line, pos));
    }

    /// Move one word to the right (Ctrl+Right).
    pub fn move_word_right(&mut self, extend: bool) {
        self.begin_motion(extend);
        let Cursor { line, col } = self.cursor;
        let text = self.line_at(line).unwrap_or_default();
        if col >= text.len() {
            if line + 1 < self.line_count() {
                self.set_cursor(Cursor::at(line + 1, 0));
            }
            return;
        }

        let after = &text[col..];
        let word_end = after.find(|c: char| !is_word_char(c)).unwrap_or(after.len());
        let rest = &after[word_end..];
        let gap_end = rest.find(is_word_char).unwrap_or(rest.len());
        self.set_cursor(Cursor::at(line, col + word_end + gap_end));
    }

    /// Move to a line and byte column, both clamped.
    pub fn move_to(&mut self, line: usize, col: usize, extend: bool) {
        self.begin_motion(extend);
        let line = line.min(self.line_count().saturating_sub(1));
        let offset = self.rope.line_to_byte(line) + col.min(self.line_len(line));
        self.set_cursor(self.cursor_at(offset));
    }

    /// Move to the start of the buffer (Ctrl+Home).
    pub fn move_to_start(&mut self, extend: bool) {
        self.begin_motion(extend);
        self.set_cursor(Cursor::default());
    }

    /// Move to the end of the buffer (Ctrl+End).
    pub fn move_to_end(&mut self, extend: bool) {
        self.begin_motion(extend);
        let last = self.line_count().saturating_sub(1);
        self.set_cursor(Cursor::at(last, self.line_len(last)));
    }

    // --- Private helpers ---

    const fn begin_motion(&mut self, extend: bool) {
        if !extend {
            self.anchor = None;
        } else if self.anchor.is_none() {
            self.anchor = Some(self.cursor);
        }
    }

    const fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
        self.goal_col = cursor.col;
    }

    fn delete_selection(&mut self) -> bool {
        let range = self.selection();
        self.anchor = None;
        if range.is_empty() {
            return false;
        }
        self.remove_bytes(range.clone());
        self.dirty = true;
        self.set_cursor(self.cursor_at(range.start));
        true
    }

    fn remove_bytes(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let start = self.rope.byte_to_char(range.start);
        let end = self.rope.byte_to_char(range.end);
        self.rope.remove(start..end);
    }

    fn move_left(&mut self) {
        let offset = self.caret_offset();
        if offset > 0 {
            let char_idx = self.rope.byte_to_char(offset);
            self.set_cursor(self.cursor_at(self.rope.char_to_byte(char_idx - 1)));
        }
    }

    fn move_right(&mut self) {
        let offset = self.caret_offset();
        if offset < self.rope.len_bytes() {
            let char_idx = self.rope.byte_to_char(offset);
            self.set_cursor(self.cursor_at(self.rope.char_to_byte(char_idx + 1)));
        }
    }

    fn move_vertical(&mut self, lines: isize) {
        let last = self.line_count().saturating_sub(1);
        let target = self.cursor.line.saturating_add_signed(lines).min(last);
        if target == self.cursor.line {
            return;
        }
        let goal = self.goal_col;
        let offset = self.rope.line_to_byte(target) + goal.min(self.line_len(target));
        self.cursor = self.cursor_at(offset);
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .field("anchor", &self.anchor)
            .field("dirty", &self.dirty)
            .finish()
    }
}

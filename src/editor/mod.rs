//! The pseudocode editing surface.
//!
//! [`Editor`] ties a rope-backed [`EditorBuffer`] to the structural
//! keystroke rules in [`keys`], the indentation normalizer, and one shared
//! [`Viewport`] that the gutter, the highlighted text and the caret all
//! render from.

mod buffer;
pub mod keys;
mod viewport;

use unicode_width::UnicodeWidthChar;

pub use buffer::{Cursor, Direction, EditorBuffer};
pub use keys::{EditKey, KeyOutcome};
pub use viewport::Viewport;

use crate::format::format_pseudocode;
use crate::highlight::to_markup;
use crate::indent::{IndentUnit, DEFAULT_INDENT_WIDTH};

/// Placeholder shown while the buffer is empty.
pub const DEFAULT_PLACEHOLDER: &str = "// Write your pseudocode here...";

/// Caller-supplied editor settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Ignore every mutation from keys and formatting.
    pub read_only: bool,
    pub placeholder: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            read_only: false,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

/// Callback invoked with the full text after every change.
pub type TextChanged = Box<dyn FnMut(&str)>;

/// A pseudocode editor: buffer, rules, scroll state and change listeners.
pub struct Editor {
    buffer: EditorBuffer,
    config: EditorConfig,
    unit: IndentUnit,
    viewport: Viewport,
    listeners: Vec<TextChanged>,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_text("", config)
    }

    pub fn with_text(text: &str, config: EditorConfig) -> Self {
        let unit = IndentUnit::new(config.indent_width);
        let mut editor = Self {
            buffer: EditorBuffer::from_text(text),
            config,
            unit,
            viewport: Viewport::default(),
            listeners: Vec::new(),
        };
        editor.sync_viewport();
        editor
    }

    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub const fn buffer(&self) -> &EditorBuffer {
        &self.buffer
    }

    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub const fn indent_unit(&self) -> &IndentUnit {
        &self.unit
    }

    pub const fn is_read_only(&self) -> bool {
        self.config.read_only
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Number of `\n`-separated lines, never less than one.
    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub const fn is_dirty(&self) -> bool {
        self.buffer.is_dirty()
    }

    pub const fn mark_clean(&mut self) {
        self.buffer.mark_clean();
    }

    /// Placeholder text, shown only while the buffer is empty.
    pub fn placeholder(&self) -> Option<&str> {
        (self.buffer.is_empty() && !self.config.placeholder.is_empty()).then_some(self.config.placeholder.as_str())
    }

    /// Register a listener called with the full text after each change.
    pub fn on_text_changed(&mut self, listener: impl FnMut(&str) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Replace the text programmatically, keeping the caret where it can.
    ///
    /// Applies even when read-only; the flag only blocks user edits.
    pub fn set_text(&mut self, text: &str) {
        if self.buffer.text() == text {
            return;
        }
        let caret = self.buffer.caret_offset();
        self.buffer.replace(text, caret);
        self.changed();
    }

    /// Normalize indentation. Returns `true` if the text changed.
    ///
    /// Disabled when read-only or when the buffer holds only whitespace.
    pub fn format(&mut self) -> bool {
        if !self.can_format() {
            return false;
        }
        let text = self.buffer.text();
        let formatted = format_pseudocode(&text, &self.unit);
        if formatted == text {
            return false;
        }
        let caret = self.buffer.caret_offset().min(formatted.len());
        self.buffer.replace(&formatted, caret);
        self.changed();
        true
    }

    pub fn can_format(&self) -> bool {
        !self.config.read_only && !self.buffer.text().trim().is_empty()
    }

    /// The highlighted overlay as span markup. A trailing newline is
    /// appended so a final empty line still occupies a row.
    pub fn overlay_markup(&self) -> String {
        let mut markup = to_markup(&self.buffer.text());
        markup.push('\n');
        markup
    }

    // --- Keys ---

    /// Route a key through the structural rules, falling back to plain
    /// typing. Returns `true` if the text changed.
    pub fn handle_key(&mut self, key: EditKey) -> bool {
        if self.config.read_only {
            return false;
        }
        let text = self.buffer.text();
        match keys::handle_key(&text, self.buffer.selection(), key, &self.unit) {
            KeyOutcome::Edited(edit) => {
                self.buffer.replace(&edit.text, edit.caret);
                self.changed();
                true
            }
            KeyOutcome::Swallowed => false,
            KeyOutcome::Fallthrough => match key {
                EditKey::Char(ch) => {
                    self.buffer.insert_char(ch);
                    self.changed();
                    true
                }
                _ => false,
            },
        }
    }

    /// Insert pasted text verbatim, replacing any selection.
    pub fn paste(&mut self, text: &str) -> bool {
        if self.config.read_only || text.is_empty() {
            return false;
        }
        self.buffer.insert_str(text);
        self.changed();
        true
    }

    pub fn delete_back(&mut self) -> bool {
        if self.config.read_only || !self.buffer.delete_back() {
            return false;
        }
        self.changed();
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.config.read_only || !self.buffer.delete_forward() {
            return false;
        }
        self.changed();
        true
    }

    // --- Caret movement (allowed when read-only) ---

    pub fn move_caret(&mut self, motion: Motion, extend: bool) {
        let page = (self.viewport.height().max(2) - 1) as isize;
        match motion {
            Motion::Left => self.buffer.move_cursor(Direction::Left, extend),
            Motion::Right => self.buffer.move_cursor(Direction::Right, extend),
            Motion::Up => self.buffer.move_cursor(Direction::Up, extend),
            Motion::Down => self.buffer.move_cursor(Direction::Down, extend),
            Motion::WordLeft => self.buffer.move_word_left(extend),
            Motion::WordRight => self.buffer.move_word_right(extend),
            Motion::LineStart => self.buffer.move_home(extend),
            Motion::LineEnd => self.buffer.move_end(extend),
            Motion::BufferStart => self.buffer.move_to_start(extend),
            Motion::BufferEnd => self.buffer.move_to_end(extend),
            Motion::PageUp => self.buffer.move_lines(-page, extend),
            Motion::PageDown => self.buffer.move_lines(page, extend),
        }
        self.sync_viewport();
    }

    pub fn select_all(&mut self) {
        self.buffer.select_all();
        self.sync_viewport();
    }

    /// Place the caret at a cell of the text area, given relative to the
    /// top-left of the visible text (gutter excluded).
    pub fn click(&mut self, row: usize, col: usize, extend: bool) {
        let line = self.viewport.top() + row;
        let text = self
            .buffer
            .line_at(line.min(self.line_count().saturating_sub(1)))
            .unwrap_or_default();
        let byte_col = byte_col_at_display(&text, self.viewport.left() + col);
        self.buffer.move_to(line, byte_col, extend);
        self.sync_viewport();
    }

    // --- Scrolling ---

    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport.resize(width, height);
        self.sync_viewport();
    }

    /// Scroll without moving the caret.
    pub fn scroll(&mut self, delta: Scroll) {
        match delta {
            Scroll::Up(n) => self.viewport.scroll_up(n),
            Scroll::Down(n) => self.viewport.scroll_down(n),
            Scroll::Left(n) => self.viewport.scroll_left(n),
            Scroll::Right(n) => self.viewport.scroll_right(n),
        }
    }

    /// Columns available for text once the gutter is drawn.
    pub fn text_width(&self) -> usize {
        usize::from(self.viewport.width().saturating_sub(gutter_width(self.line_count())))
    }

    /// Display column of the caret within its line.
    pub fn caret_display_col(&self) -> usize {
        let cursor = self.buffer.cursor();
        let line = self.buffer.line_at(cursor.line).unwrap_or_default();
        display_width(&line[..cursor.col.min(line.len())])
    }

    fn changed(&mut self) {
        self.sync_viewport();
        if self.listeners.is_empty() {
            return;
        }
        let text = self.buffer.text();
        tracing::trace!(bytes = text.len(), "editor.text_changed");
        for listener in &mut self.listeners {
            listener(&text);
        }
    }

    /// Refresh the shared scroll extents and keep the caret on screen.
    fn sync_viewport(&mut self) {
        let total = self.buffer.line_count();
        let content_width = (0..total)
            .filter_map(|i| self.buffer.line_at(i))
            .map(|line| display_width(&line))
            .max()
            .unwrap_or(0);
        self.viewport.set_extent(total, content_width);
        let caret_line = self.buffer.cursor().line;
        let caret_col = self.caret_display_col();
        let text_width = self.text_width();
        self.viewport.ensure_visible(caret_line, caret_col, text_width);
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("buffer", &self.buffer)
            .field("config", &self.config)
            .field("viewport", &self.viewport)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Caret motions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    WordLeft,
    WordRight,
    LineStart,
    LineEnd,
    BufferStart,
    BufferEnd,
    PageUp,
    PageDown,
}

/// Viewport scroll requests, in lines or columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scroll {
    Up(usize),
    Down(usize),
    Left(usize),
    Right(usize),
}

/// Width of the line-number column for a buffer of `total_lines`.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}

/// Total gutter width: the padded line number plus a separator column.
pub const fn gutter_width(total_lines: usize) -> u16 {
    let digits = line_number_width(total_lines);
    (if digits < 2 { 2 } else { digits }) + 2
}

/// Terminal cells taken by `text`. Tabs count as one cell; the renderer
/// draws them as a single space.
pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Byte column of the character under display column `col`, or the line
/// length when `col` is past the end.
pub fn byte_col_at_display(line: &str, col: usize) -> usize {
    let mut seen = 0;
    for (i, ch) in line.char_indices() {
        let width = char_width(ch);
        if seen + width > col {
            return i;
        }
        seen += width;
    }
    line.len()
}

/// Terminal cells taken by a single character, as [`display_width`] counts them.
pub fn char_width(ch: char) -> usize {
    if ch.is_control() {
        1
    } else {
        UnicodeWidthChar::width(ch).unwrap_or(0)
    }
}

//! Canonical indentation unit shared by the formatter and the key handler.

/// Default number of spaces per indentation level.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Widest unit accepted from flags and config files.
pub const MAX_INDENT_WIDTH: usize = 16;

/// Columns a tab counts for when measuring existing indentation.
pub const TAB_WIDTH: usize = 4;

/// A fixed run of spaces inserted or removed per indentation action.
///
/// # Example
///
/// ```
/// use pseudopad::indent::IndentUnit;
///
/// let unit = IndentUnit::new(2);
/// assert_eq!(unit.as_str(), "  ");
/// assert_eq!(unit.repeat(3), "      ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentUnit {
    spaces: String,
}

impl IndentUnit {
    /// Create a unit of `width` spaces, clamped to `1..=MAX_INDENT_WIDTH`.
    pub fn new(width: usize) -> Self {
        Self {
            spaces: " ".repeat(width.clamp(1, MAX_INDENT_WIDTH)),
        }
    }

    /// Number of spaces in one unit.
    pub const fn width(&self) -> usize {
        self.spaces.len()
    }

    /// The unit as a string of spaces.
    pub fn as_str(&self) -> &str {
        &self.spaces
    }

    /// `level` units concatenated.
    pub fn repeat(&self, level: usize) -> String {
        self.spaces.repeat(level)
    }
}

impl Default for IndentUnit {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT_WIDTH)
    }
}

/// The leading whitespace of `line`.
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(line.len(), |(i, _)| i);
    &line[..end]
}

/// Width of the leading whitespace of `line`, with tabs counted as
/// [`TAB_WIDTH`] columns and every other whitespace character as one.
pub fn leading_width(line: &str) -> usize {
    leading_whitespace(line)
        .chars()
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

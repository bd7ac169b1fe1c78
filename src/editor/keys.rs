//! Structural keystroke rules.
//!
//! Each rule is a pure function of `(text, selection, key)`. A rule that
//! applies returns the whole replacement text and the new caret offset;
//! everything else falls through to ordinary typing. Selections are byte
//! ranges into `text`.

use std::ops::Range;

use crate::indent::{leading_whitespace, IndentUnit};

/// Keys with structural behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Tab,
    /// Shift+Tab.
    BackTab,
    Enter,
    Char(char),
}

/// A full-buffer replacement produced by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub text: String,
    /// Byte offset of the caret in `text`.
    pub caret: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The rule applied; replace the buffer.
    Edited(Edit),
    /// The key was consumed without changing anything.
    Swallowed,
    /// No rule applies; use default typing.
    Fallthrough,
}

/// Apply the structural rule for `key`, if any.
pub fn handle_key(text: &str, selection: Range<usize>, key: EditKey, unit: &IndentUnit) -> KeyOutcome {
    let selection = clamp(text, selection);
    match key {
        EditKey::Tab => KeyOutcome::Edited(indent(text, selection, unit)),
        EditKey::BackTab => outdent(text, selection.start, unit).map_or(KeyOutcome::Swallowed, KeyOutcome::Edited),
        EditKey::Enter => KeyOutcome::Edited(newline_with_indent(text, selection, unit)),
        EditKey::Char(ch) => auto_close(text, selection, ch).map_or(KeyOutcome::Fallthrough, KeyOutcome::Edited),
    }
}

/// Replace the selection with one indent unit.
pub fn indent(text: &str, selection: Range<usize>, unit: &IndentUnit) -> Edit {
    let mut out = String::with_capacity(text.len() + unit.width());
    out.push_str(&text[..selection.start]);
    out.push_str(unit.as_str());
    out.push_str(&text[selection.end..]);
    Edit {
        text: out,
        caret: selection.start + unit.width(),
    }
}

/// Remove one indent unit from the start of the caret's line, if the line
/// (up to the caret) begins with one.
pub fn outdent(text: &str, caret: usize, unit: &IndentUnit) -> Option<Edit> {
    let line_start = line_start(text, caret);
    if !text[line_start..caret].starts_with(unit.as_str()) {
        return None;
    }
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..line_start]);
    out.push_str(&text[line_start + unit.width()..]);
    Some(Edit {
        text: out,
        caret: caret - unit.width(),
    })
}

/// The closing partner of an auto-closed bracket.
pub const fn closing_bracket(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

/// Insert a bracket pair with the caret between, when nothing is selected.
pub fn auto_close(text: &str, selection: Range<usize>, open: char) -> Option<Edit> {
    let close = closing_bracket(open)?;
    if !selection.is_empty() {
        return None;
    }
    let at = selection.start;
    let mut out = String::with_capacity(text.len() + 2);
    out.push_str(&text[..at]);
    out.push(open);
    out.push(close);
    out.push_str(&text[at..]);
    Some(Edit {
        text: out,
        caret: at + open.len_utf8(),
    })
}

/// Insert a newline at the selection start carrying the current line's
/// indentation, plus one unit when the line opens a block. Selected text is
/// kept and moves to the new line.
pub fn newline_with_indent(text: &str, selection: Range<usize>, unit: &IndentUnit) -> Edit {
    let current = &text[line_start(text, selection.start)..selection.start];
    let mut indent = leading_whitespace(current).to_string();
    if opens_block(current) {
        indent.push_str(unit.as_str());
    }

    let mut out = String::with_capacity(text.len() + indent.len() + 1);
    out.push_str(&text[..selection.start]);
    out.push('\n');
    out.push_str(&indent);
    out.push_str(&text[selection.start..]);
    Edit {
        text: out,
        caret: selection.start + 1 + indent.len(),
    }
}

/// Whether `line` ends (ignoring trailing whitespace) with the whole word
/// `do` or `then`, in any case.
pub fn opens_block(line: &str) -> bool {
    let line = line.trim_end();
    ["do", "then"].iter().any(|opener| {
        let Some(split) = line.len().checked_sub(opener.len()) else {
            return false;
        };
        line.is_char_boundary(split)
            && line[split..].eq_ignore_ascii_case(opener)
            && !line[..split]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}

fn line_start(text: &str, offset: usize) -> usize {
    text[..offset].rfind('\n').map_or(0, |i| i + 1)
}

fn clamp(text: &str, selection: Range<usize>) -> Range<usize> {
    let snap = |mut at: usize| {
        at = at.min(text.len());
        while !text.is_char_boundary(at) {
            at -= 1;
        }
        at
    };
    let (a, b) = (snap(selection.start), snap(selection.end));
    a.min(b)..a.max(b)
}

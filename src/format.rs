//! Indentation normalizer.
//!
//! Pseudocode scopes blocks by indentation alone, so the block structure
//! cannot be rebuilt from keywords. Instead the formatter infers the unit the
//! author used (the smallest non-zero indentation in the document) and
//! rewrites every line at the same relative level using the canonical unit.
//! Only leading whitespace changes; line content and order are untouched.

use crate::indent::{leading_width, IndentUnit, DEFAULT_INDENT_WIDTH};

/// The smallest non-zero leading-whitespace width among non-blank lines,
/// or [`DEFAULT_INDENT_WIDTH`] when no line is indented.
pub fn detect_indent_unit(text: &str) -> usize {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(leading_width)
        .filter(|&width| width > 0)
        .min()
        .unwrap_or(DEFAULT_INDENT_WIDTH)
}

/// Rewrite the indentation of every line of `text` as a multiple of `unit`.
///
/// Each line's level is its original indentation divided by the detected
/// unit, rounded to the nearest integer with halves rounding up. Blank lines
/// become empty.
pub fn format_pseudocode(text: &str, unit: &IndentUnit) -> String {
    let detected = detect_indent_unit(text);
    tracing::debug!(detected, canonical = unit.width(), "format.detect");

    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                return String::new();
            }
            let level = rounded_level(leading_width(line), detected);
            let mut out = unit.repeat(level);
            out.push_str(line.trim_start());
            out
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `round(width / unit)` with ties rounding up.
const fn rounded_level(width: usize, unit: usize) -> usize {
    (2 * width + unit) / (2 * unit)
}

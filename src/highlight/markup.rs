//! Markup rendering of classified tokens.
//!
//! Produces `<span class="token …">` annotated text for hosts that render
//! markup (the overlay form of the editor). Text is escaped per token after
//! classification, so entity sequences are never re-tokenized.

use super::token::tokenize_line;

/// Escape the characters that carry meaning in markup.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render one line as escaped, span-annotated markup.
pub fn line_to_markup(line: &str) -> String {
    let mut out = String::with_capacity(line.len() * 2);
    for token in tokenize_line(line) {
        let text = escape_markup(token.text(line));
        match token.kind.css_class() {
            Some(class) => {
                out.push_str("<span class=\"token ");
                out.push_str(class);
                out.push_str("\">");
                out.push_str(&text);
                out.push_str("</span>");
            }
            None => out.push_str(&text),
        }
    }
    out
}

/// Render a full buffer, line by line, joined with `\n`.
pub fn to_markup(text: &str) -> String {
    text.split('\n')
        .map(line_to_markup)
        .collect::<Vec<_>>()
        .join("\n")
}

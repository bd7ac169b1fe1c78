use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

/// Reserved words of the pseudocode dialect (matched case-insensitively).
pub const KEYWORDS: &[&str] = &[
    "if", "then", "else", "elseif", "for", "to", "downto", "do", "while", "repeat", "until",
    "return", "and", "or", "not", "true", "false", "nil", "error", "exchange", "let", "mod",
    "div",
];

/// Built-in functions, highlighted only when called or indexed.
pub const BUILTINS: &[&str] = &[
    "length", "floor", "ceiling", "min", "max", "abs", "sqrt", "log", "print",
];

/// An all-caps procedure name at column 0 followed by its parameter list.
static DEFINITION_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z][A-Z0-9-]*)[ \t]*\(").expect("definition name pattern is valid")
});

/// Lexical category of a highlighted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Comment,
    Operator,
    Number,
    /// Name of a procedure being defined (`INSERTION-SORT(A)`).
    Function,
    Builtin,
    Keyword,
    /// Base name of an indexed array (`A` in `A[i]`).
    Variable,
    Plain,
}

impl TokenKind {
    /// CSS class used by the markup renderer, `None` for plain text.
    pub const fn css_class(self) -> Option<&'static str> {
        match self {
            Self::Comment => Some("comment"),
            Self::Operator => Some("operator"),
            Self::Number => Some("number"),
            Self::Function => Some("function"),
            Self::Builtin => Some("builtin"),
            Self::Keyword => Some("keyword"),
            Self::Variable => Some("variable"),
            Self::Plain => None,
        }
    }
}

/// A classified byte range within a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: Range<usize>,
}

impl Token {
    pub const fn new(kind: TokenKind, range: Range<usize>) -> Self {
        Self { kind, range }
    }

    /// Slice this token's text out of the line it was produced from.
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        &line[self.range.clone()]
    }
}

/// Split a single line into non-overlapping tokens.
///
/// The returned ranges tile `line` exactly: they are ordered, contiguous,
/// and cover every byte. Adjacent plain runs are merged.
pub fn tokenize_line(line: &str) -> Vec<Token> {
    let mut scanner = Scanner::new(line);
    scanner.run();
    scanner.tokens
}

/// Tokenize every line of a buffer (split on `\n`).
pub fn tokenize(text: &str) -> Vec<Vec<Token>> {
    text.split('\n').map(tokenize_line).collect()
}

struct Scanner<'a> {
    line: &'a str,
    bytes: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    const fn new(line: &'a str) -> Self {
        Self {
            line,
            bytes: line.as_bytes(),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn run(&mut self) {
        if let Some(name) = DEFINITION_NAME
            .captures(self.line)
            .and_then(|c| c.get(1))
            .filter(|name| !self.name_has_number(name.end()))
        {
            self.push(TokenKind::Function, 0..name.end());
            self.pos = name.end();
        }

        while self.pos < self.bytes.len() {
            let rest = &self.line[self.pos..];
            if rest.starts_with("//") {
                self.push(TokenKind::Comment, self.pos..self.bytes.len());
                return;
            }

            let Some(ch) = rest.chars().next() else {
                return;
            };
            if matches!(ch, '←' | '≤' | '≥' | '≠') {
                let end = self.pos + ch.len_utf8();
                self.push(TokenKind::Operator, self.pos..end);
                self.pos = end;
                continue;
            }

            if is_word_byte(self.bytes[self.pos]) && self.at_word_boundary() {
                self.scan_word();
                continue;
            }

            let end = self.pos + ch.len_utf8();
            self.push(TokenKind::Plain, self.pos..end);
            self.pos = end;
        }
    }

    /// Numbers claim their span before definition names do, so a segment
    /// like the `2` in `SORT-2(` breaks the name.
    fn name_has_number(&self, name_end: usize) -> bool {
        (1..name_end).any(|i| {
            self.bytes[i].is_ascii_digit()
                && self.bytes[i - 1] == b'-'
                && self.number_end(i).is_some()
        })
    }

    fn at_word_boundary(&self) -> bool {
        self.pos == 0 || !is_word_byte(self.bytes[self.pos - 1])
    }

    fn scan_word(&mut self) {
        let start = self.pos;
        let end = self.word_end(start);
        let next = self.bytes.get(end).copied();

        if self.bytes[start].is_ascii_digit() {
            if let Some(number_end) = self.number_end(start) {
                self.push(TokenKind::Number, start..number_end);
                self.pos = number_end;
                return;
            }
            // `9abc[`: the identifier part still names an array.
            let ident_start = (start..end)
                .find(|&i| self.bytes[i].is_ascii_alphabetic() || self.bytes[i] == b'_');
            match ident_start {
                Some(ident) if next == Some(b'[') => {
                    self.push(TokenKind::Plain, start..ident);
                    self.push(TokenKind::Variable, ident..end);
                }
                _ => self.push(TokenKind::Plain, start..end),
            }
            self.pos = end;
            return;
        }

        let word = self.line[start..end].to_ascii_lowercase();
        let kind = if BUILTINS.contains(&word.as_str()) && matches!(next, Some(b'[' | b'(')) {
            TokenKind::Builtin
        } else if KEYWORDS.contains(&word.as_str()) {
            TokenKind::Keyword
        } else if next == Some(b'[') {
            TokenKind::Variable
        } else {
            TokenKind::Plain
        };
        self.push(kind, start..end);
        self.pos = end;
    }

    fn word_end(&self, from: usize) -> usize {
        self.bytes[from..]
            .iter()
            .position(|b| !is_word_byte(*b))
            .map_or(self.bytes.len(), |offset| from + offset)
    }

    fn digits_end(&self, from: usize) -> usize {
        self.bytes[from..]
            .iter()
            .position(|b| !b.is_ascii_digit())
            .map_or(self.bytes.len(), |offset| from + offset)
    }

    /// End of a numeric literal starting at `start`, bounded on the right by
    /// a word boundary. Prefers the longest form (`3.14`), then `3.`, then `3`.
    fn number_end(&self, start: usize) -> Option<usize> {
        let int_end = self.digits_end(start);
        let word_at = |i: usize| self.bytes.get(i).is_some_and(|b| is_word_byte(*b));

        if self.bytes.get(int_end) == Some(&b'.') {
            let frac_end = self.digits_end(int_end + 1);
            if frac_end > int_end + 1 && !word_at(frac_end) {
                return Some(frac_end);
            }
            if word_at(int_end + 1) {
                return Some(int_end + 1);
            }
            return Some(int_end);
        }

        (!word_at(int_end)).then_some(int_end)
    }

    fn push(&mut self, kind: TokenKind, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        if kind == TokenKind::Plain
            && let Some(last) = self.tokens.last_mut()
            && last.kind == TokenKind::Plain
            && last.range.end == range.start
        {
            last.range.end = range.end;
            return;
        }
        self.tokens.push(Token::new(kind, range));
    }
}

const fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

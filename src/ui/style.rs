//! Theming and color definitions.
//!
//! Token colors use ANSI and xterm-256 indexes so they follow the
//! terminal's palette, with a darker variant for light backgrounds.

use ratatui::style::{Color, Modifier, Style};

use crate::highlight::TokenKind;

/// Get the style for a highlighted token.
pub fn style_for_token(kind: TokenKind) -> Style {
    let light_bg = crate::highlight::is_light_background();
    match kind {
        TokenKind::Comment => Style::default()
            .fg(if light_bg {
                Color::Indexed(242)
            } else {
                Color::Indexed(245)
            })
            .add_modifier(Modifier::ITALIC),
        TokenKind::Operator => Style::default().fg(if light_bg {
            Color::Indexed(124)
        } else {
            Color::LightRed
        }),
        TokenKind::Number => Style::default().fg(if light_bg {
            Color::Indexed(130)
        } else {
            Color::Yellow
        }),
        TokenKind::Function => Style::default()
            .fg(if light_bg {
                Color::Indexed(25)
            } else {
                Color::LightBlue
            })
            .add_modifier(Modifier::BOLD),
        TokenKind::Builtin => Style::default().fg(if light_bg {
            Color::Indexed(30)
        } else {
            Color::Cyan
        }),
        TokenKind::Keyword => Style::default()
            .fg(if light_bg {
                Color::Indexed(90)
            } else {
                Color::Magenta
            })
            .add_modifier(Modifier::BOLD),
        TokenKind::Variable => Style::default().fg(if light_bg {
            Color::Indexed(28)
        } else {
            Color::Green
        }),
        TokenKind::Plain => Style::default(),
    }
}

/// Colors for the editor chrome around the text.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Line numbers in the gutter
    pub gutter: Style,
    /// Line number of the caret's line
    pub gutter_current: Style,
    /// Title bar
    pub header: Style,
    /// Placeholder text shown in an empty buffer
    pub placeholder: Style,
    /// Selected text
    pub selection: Style,
    /// Status bar background
    pub status_bg: Color,
    /// Status bar foreground
    pub status_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            gutter: Style::default().fg(Color::Indexed(240)),
            gutter_current: Style::default()
                .fg(Color::Indexed(250))
                .add_modifier(Modifier::BOLD),
            header: Style::default()
                .bg(Color::Indexed(236))
                .fg(Color::Indexed(252))
                .add_modifier(Modifier::BOLD),
            placeholder: Style::default()
                .fg(Color::Indexed(240))
                .add_modifier(Modifier::ITALIC),
            selection: Style::default().bg(Color::Indexed(238)),
            status_bg: Color::Indexed(236), // Dark gray that works on both
            status_fg: Color::Indexed(252), // Light gray
        }
    }
}

impl Theme {
    /// Create a theme optimized for dark terminals.
    pub fn dark() -> Self {
        Self::default()
    }

    /// Create a theme optimized for light terminals.
    pub fn light() -> Self {
        Self {
            gutter: Style::default().fg(Color::Indexed(247)),
            gutter_current: Style::default()
                .fg(Color::Indexed(236))
                .add_modifier(Modifier::BOLD),
            header: Style::default()
                .bg(Color::Indexed(252))
                .fg(Color::Indexed(235))
                .add_modifier(Modifier::BOLD),
            placeholder: Style::default()
                .fg(Color::Indexed(247))
                .add_modifier(Modifier::ITALIC),
            selection: Style::default().bg(Color::Indexed(153)),
            status_bg: Color::Indexed(252),
            status_fg: Color::Indexed(235),
        }
    }

    /// The theme matching the detected terminal background.
    pub fn current() -> Self {
        if crate::highlight::is_light_background() {
            Self::light()
        } else {
            Self::dark()
        }
    }
}

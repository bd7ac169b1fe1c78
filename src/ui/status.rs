use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

use super::style::Theme;

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect, theme: &Theme) {
    let editor = &model.editor;
    let cursor = editor.buffer().cursor();
    let position = format!("Ln {}, Col {}", cursor.line + 1, editor.caret_display_col() + 1);
    let indent = format!("Spaces: {}", editor.indent_unit().width());
    let read_only = if editor.is_read_only() { "  [read-only]" } else { "" };
    let analyzing = if model.analysis_running() { "  [analyzing]" } else { "" };

    let status = format!(
        " {position}  {indent}{read_only}{analyzing}  F1:help  ^F:format  ^R:analyze  ^S:save  ^Q:quit"
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(theme.status_bg).fg(theme.status_fg));

    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}

use std::ops::Range;

use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};

use crate::app::Model;
use crate::editor::{char_width, display_width, gutter_width, Cursor};
use crate::highlight::tokenize_line;

use super::style::{style_for_token, Theme};
use super::{overlays, status};

/// Split the frame into header, text area and status row.
pub fn split_chrome(area: Rect) -> (Rect, Rect, Rect) {
    let header = Rect { height: 1.min(area.height), ..area };
    let text = Rect {
        y: area.y + 1,
        height: area.height.saturating_sub(2),
        ..area
    };
    let status = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1.min(area.height),
        ..area
    };
    (header, text, status)
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let theme = Theme::current();
    let (header_area, text_area, status_area) = split_chrome(area);

    render_header(model, frame, header_area, &theme);
    render_text(model, frame, text_area, &theme);

    if model.active_toast().is_some() {
        status::render_toast_bar(model, frame, status_area);
    } else {
        status::render_status_bar(model, frame, status_area, &theme);
    }

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_header(model: &Model, frame: &mut Frame, area: Rect, theme: &Theme) {
    let dirty = if model.editor.is_dirty() { " [modified]" } else { "" };
    let title = format!(" {}{dirty}", model.title());
    let lines = model.editor.line_count();
    let count = if lines == 1 {
        "1 line ".to_string()
    } else {
        format!("{lines} lines ")
    };
    let pad = usize::from(area.width).saturating_sub(display_width(&title) + count.len());

    let header = format!("{title}{}{count}", " ".repeat(pad));
    frame.render_widget(Paragraph::new(header).style(theme.header), area);
}

fn render_text(model: &Model, frame: &mut Frame, area: Rect, theme: &Theme) {
    let editor = &model.editor;
    let buffer = editor.buffer();
    let viewport = editor.viewport();
    let gutter = gutter_width(editor.line_count());
    let number_width = usize::from(gutter.saturating_sub(2));
    let text_width = usize::from(area.width.saturating_sub(gutter));
    let cursor = buffer.cursor();
    let selection = buffer.selection();

    let mut content: Vec<Line> = Vec::new();
    if let Some(placeholder) = editor.placeholder() {
        content.push(Line::from(vec![
            gutter_span(0, number_width, theme.gutter_current),
            Span::styled(placeholder.to_string(), theme.placeholder),
        ]));
    } else {
        for line_idx in viewport.visible_range() {
            let line_text = buffer.line_at(line_idx).unwrap_or_default();
            let line_start = buffer.offset_of(Cursor::at(line_idx, 0));
            let number_style = if line_idx == cursor.line {
                theme.gutter_current
            } else {
                theme.gutter
            };
            let mut spans = vec![gutter_span(line_idx, number_width, number_style)];
            spans.extend(highlighted_spans(
                &line_text,
                line_start,
                &selection,
                viewport.left(),
                text_width,
                theme.selection,
            ));
            content.push(Line::from(spans));
        }
    }

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content), area);

    let caret_col = editor.caret_display_col();
    let visible_lines = viewport.top()..viewport.top() + usize::from(area.height);
    let visible_cols = viewport.left()..viewport.left() + text_width.max(1);
    if visible_lines.contains(&cursor.line) && visible_cols.contains(&caret_col) {
        // Both offsets are bounded by the area size checked above.
        #[allow(clippy::cast_possible_truncation)]
        let x = area.x + gutter + (caret_col - viewport.left()) as u16;
        #[allow(clippy::cast_possible_truncation)]
        let y = area.y + (cursor.line - viewport.top()) as u16;
        frame.set_cursor_position((x, y));
    }
}

fn gutter_span(line_idx: usize, width: usize, style: Style) -> Span<'static> {
    Span::styled(format!("{:>width$}\u{2502} ", line_idx + 1), style)
}

/// Style one line: token colors, then the selection background, clipped
/// to the display columns `left..left + width`.
fn highlighted_spans(
    line: &str,
    line_start: usize,
    selection: &Range<usize>,
    left: usize,
    width: usize,
    selection_style: Style,
) -> Vec<Span<'static>> {
    let tokens = tokenize_line(line);
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();
    let mut token_idx = 0;
    let mut col = 0;
    let right = left + width;

    for (i, ch) in line.char_indices() {
        let cells = char_width(ch);
        if col < left || col + cells > right {
            // A wide char cut by the left edge still owns its visible cells.
            let straddled = (col + cells).saturating_sub(left).min(width);
            if col < left && straddled > 0 {
                run.push_str(&" ".repeat(straddled));
            }
            col += cells;
            if col > right {
                break;
            }
            continue;
        }
        while tokens.get(token_idx).is_some_and(|t| t.range.end <= i) {
            token_idx += 1;
        }
        let mut style = tokens
            .get(token_idx)
            .filter(|t| t.range.contains(&i))
            .map_or_else(Style::default, |t| style_for_token(t.kind));
        if selection.contains(&(line_start + i)) {
            style = style.patch(selection_style);
        }
        if style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = style;
        // Tabs and control characters occupy one blank cell.
        run.push(if ch.is_control() { ' ' } else { ch });
        col += cells;
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }

    // A selected line break shows as one highlighted cell.
    let newline = line_start + line.len();
    if selection.contains(&newline) && (left..right).contains(&col) {
        spans.push(Span::styled(" ", selection_style));
    }
    spans
}

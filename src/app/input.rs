use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;

use crate::app::{App, Message, Model};
use crate::editor::{gutter_width, EditKey, Motion, Scroll};

use super::event_loop::ResizeDebouncer;

/// Lines or columns moved per mouse-wheel notch.
const WHEEL_STEP: usize = 3;

impl App {
    pub(super) fn handle_event(
        &self,
        event: Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => self.handle_key(key, model),
            Event::Mouse(mouse) => self.handle_mouse(mouse, model),
            Event::Paste(text) if !model.help_visible => Some(Message::Paste(text)),
            Event::Resize(w, h) => {
                tracing::trace!(width = w, height = h, "event.resize.queue");
                resize_debouncer.queue(w, h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_mouse(&self, mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return None;
        }
        let shift = mouse.modifiers.contains(KeyModifiers::SHIFT);

        match mouse.kind {
            MouseEventKind::ScrollDown if shift => Some(Message::Scroll(Scroll::Right(WHEEL_STEP))),
            MouseEventKind::ScrollUp if shift => Some(Message::Scroll(Scroll::Left(WHEEL_STEP))),
            MouseEventKind::ScrollDown => Some(Message::Scroll(Scroll::Down(WHEEL_STEP))),
            MouseEventKind::ScrollUp => Some(Message::Scroll(Scroll::Up(WHEEL_STEP))),
            MouseEventKind::ScrollRight => Some(Message::Scroll(Scroll::Right(WHEEL_STEP))),
            MouseEventKind::ScrollLeft => Some(Message::Scroll(Scroll::Left(WHEEL_STEP))),
            MouseEventKind::Down(MouseButton::Left) => {
                text_cell(model, mouse.column, mouse.row).map(|(row, col)| Message::Click(row, col, shift))
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                text_cell(model, mouse.column, mouse.row).map(|(row, col)| Message::Click(row, col, true))
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(&self, key: KeyEvent, model: &Model) -> Option<Message> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if model.help_visible {
            return Some(Message::HideHelp);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        if ctrl {
            return match key.code {
                KeyCode::Char('q' | 'c') => Some(Message::Quit),
                KeyCode::Char('s') => Some(Message::Save),
                KeyCode::Char('f') => Some(Message::Format),
                KeyCode::Char('r') => Some(Message::Analyze),
                KeyCode::Char('a') => Some(Message::SelectAll),
                KeyCode::Char('l') => Some(Message::Redraw),
                KeyCode::Left => Some(Message::Move(Motion::WordLeft, shift)),
                KeyCode::Right => Some(Message::Move(Motion::WordRight, shift)),
                KeyCode::Home => Some(Message::Move(Motion::BufferStart, shift)),
                KeyCode::End => Some(Message::Move(Motion::BufferEnd, shift)),
                KeyCode::Up => Some(Message::Scroll(Scroll::Up(1))),
                KeyCode::Down => Some(Message::Scroll(Scroll::Down(1))),
                _ => None,
            };
        }

        match key.code {
            KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Tab => Some(Message::Key(EditKey::Tab)),
            KeyCode::BackTab => Some(Message::Key(EditKey::BackTab)),
            KeyCode::Enter => Some(Message::Key(EditKey::Enter)),
            KeyCode::Char(c) if !alt => Some(Message::Key(EditKey::Char(c))),
            KeyCode::Backspace => Some(Message::DeleteBack),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Left => Some(Message::Move(Motion::Left, shift)),
            KeyCode::Right => Some(Message::Move(Motion::Right, shift)),
            KeyCode::Up => Some(Message::Move(Motion::Up, shift)),
            KeyCode::Down => Some(Message::Move(Motion::Down, shift)),
            KeyCode::Home => Some(Message::Move(Motion::LineStart, shift)),
            KeyCode::End => Some(Message::Move(Motion::LineEnd, shift)),
            KeyCode::PageUp => Some(Message::Move(Motion::PageUp, shift)),
            KeyCode::PageDown => Some(Message::Move(Motion::PageDown, shift)),
            _ => None,
        }
    }

    pub(super) fn view(&self, model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

/// Map a terminal cell to a `(row, col)` in the text area, below the
/// header and right of the gutter.
fn text_cell(model: &Model, column: u16, row: u16) -> Option<(usize, usize)> {
    let viewport = model.editor.viewport();
    let gutter = gutter_width(model.editor.line_count());
    if row == 0 || row > viewport.height() || column < gutter {
        return None;
    }
    Some((usize::from(row - 1), usize::from(column - gutter)))
}

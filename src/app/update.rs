use crate::app::model::{AnalysisState, CHROME_ROWS};
use crate::app::{Model, ToastLevel};
use crate::editor::{EditKey, Motion, Scroll};

/// All possible events and actions in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// A key with structural rules (Tab, Shift+Tab, Enter, typed chars)
    Key(EditKey),
    /// Bracketed paste
    Paste(String),
    /// Delete selection or character before caret (Backspace)
    DeleteBack,
    /// Delete selection or character at caret (Delete)
    DeleteForward,
    /// Normalize indentation
    Format,

    // Caret
    /// Move the caret; `true` extends the selection
    Move(Motion, bool),
    SelectAll,
    /// Click at a text-area cell (row, col); `true` extends the selection
    Click(usize, usize, bool),

    // Viewport
    Scroll(Scroll),

    // File and service
    Save,
    /// Send the buffer to the analysis service
    Analyze,

    // Overlays
    ToggleHelp,
    HideHelp,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// File writes and network requests happen in the side-effect pass that
/// follows; `update` only records that they were asked for.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Save preserves the quit flag so Ctrl+S can complete a pending quit.
    if !matches!(msg, Message::Quit | Message::Save) {
        model.quit_confirmed = false;
    }

    match msg {
        Message::Key(key) => {
            if !model.editor.handle_key(key) && model.editor.is_read_only() {
                notify_read_only(&mut model);
            }
        }
        Message::Paste(text) => {
            if !model.editor.paste(&text) && model.editor.is_read_only() {
                notify_read_only(&mut model);
            }
        }
        Message::DeleteBack => {
            model.editor.delete_back();
        }
        Message::DeleteForward => {
            model.editor.delete_forward();
        }
        Message::Format => {
            if model.editor.is_read_only() {
                notify_read_only(&mut model);
            } else if !model.editor.can_format() {
                model.show_toast(ToastLevel::Info, "Nothing to format");
            } else if model.editor.format() {
                model.show_toast(ToastLevel::Info, "Formatted");
            } else {
                model.show_toast(ToastLevel::Info, "Already formatted");
            }
        }

        Message::Move(motion, extend) => model.editor.move_caret(motion, extend),
        Message::SelectAll => model.editor.select_all(),
        Message::Click(row, col, extend) => model.editor.click(row, col, extend),
        Message::Scroll(delta) => model.editor.scroll(delta),

        // Performed in the side-effect pass.
        Message::Save | Message::Redraw => {}
        Message::Analyze => {
            let text = model.editor.text();
            if model.analysis_running() {
                model.show_toast(ToastLevel::Info, "Analysis already running");
            } else if text.trim().is_empty() {
                model.show_toast(ToastLevel::Warning, "Nothing to analyze");
            } else {
                model.analysis = AnalysisState::Queued(text);
                model.show_toast(ToastLevel::Info, "Analyzing…");
            }
        }

        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,

        Message::Resize(width, height) => {
            model.editor.resize(width, height.saturating_sub(CHROME_ROWS));
        }

        Message::Quit => {
            if model.editor.is_dirty() && !model.quit_confirmed {
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes! Press Ctrl+Q again to quit, or Ctrl+S to save",
                );
                model.quit_confirmed = true;
            } else {
                model.should_quit = true;
            }
        }
    }
    model
}

fn notify_read_only(model: &mut Model) {
    model.show_toast(ToastLevel::Warning, "Editor is read-only");
}

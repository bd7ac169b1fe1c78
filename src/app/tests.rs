use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use serde_json::json;
use tempfile::tempdir;

use crate::analysis::{AnalysisClient, AnalysisError, AnalysisReport};
use crate::editor::{gutter_width, EditKey, Editor, EditorConfig, Motion, Scroll};

use super::event_loop::ResizeDebouncer;
use super::{AnalysisState, App, Message, Model, ToastLevel, update};

fn create_test_model(text: &str) -> Model {
    Model::new(None, Editor::with_text(text, EditorConfig::default()), (80, 24))
}

fn create_read_only_model(text: &str) -> Model {
    let config = EditorConfig {
        read_only: true,
        ..EditorConfig::default()
    };
    Model::new(None, Editor::with_text(text, config), (80, 24))
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

struct FixedClient(serde_json::Value);

impl AnalysisClient for FixedClient {
    fn analyze(&self, _pseudocode: &str) -> Result<AnalysisReport, AnalysisError> {
        Ok(AnalysisReport {
            body: self.0.clone(),
        })
    }
}

// --- Editing ---

#[test]
fn test_typed_keys_reach_the_buffer() {
    let mut model = create_test_model("");
    for ch in "if x then".chars() {
        model = update(model, Message::Key(EditKey::Char(ch)));
    }
    let model = update(model, Message::Key(EditKey::Enter));
    assert_eq!(model.editor.text(), "if x then\n    ");
    assert!(model.editor.is_dirty());
}

#[test]
fn test_paste_inserts_verbatim() {
    let model = create_test_model("");
    let model = update(model, Message::Paste("for i do\n(".to_string()));
    assert_eq!(model.editor.text(), "for i do\n(");
}

#[test]
fn test_read_only_edit_shows_toast() {
    let model = create_read_only_model("x");
    let model = update(model, Message::Key(EditKey::Char('y')));
    assert_eq!(model.editor.text(), "x");
    assert_eq!(
        model.active_toast(),
        Some(("Editor is read-only", ToastLevel::Warning))
    );
}

#[test]
fn test_format_message_normalizes_indentation() {
    let model = create_test_model("while x do\n  x ← x - 1");
    let model = update(model, Message::Format);
    assert_eq!(model.editor.text(), "while x do\n    x ← x - 1");
    assert_eq!(model.active_toast(), Some(("Formatted", ToastLevel::Info)));
}

#[test]
fn test_format_on_blank_buffer_is_noop() {
    let model = create_test_model("  \n");
    let model = update(model, Message::Format);
    assert_eq!(model.editor.text(), "  \n");
    assert_eq!(model.active_toast(), Some(("Nothing to format", ToastLevel::Info)));
}

#[test]
fn test_format_when_read_only_is_refused() {
    let model = create_read_only_model("a\n  b");
    let model = update(model, Message::Format);
    assert_eq!(model.editor.text(), "a\n  b");
}

#[test]
fn test_move_and_select_all() {
    let model = create_test_model("abc\ndef");
    let model = update(model, Message::Move(Motion::Down, false));
    assert_eq!(model.editor.buffer().cursor().line, 1);
    let model = update(model, Message::SelectAll);
    assert_eq!(model.editor.buffer().selection(), 0..7);
}

#[test]
fn test_scroll_message_moves_viewport() {
    let text = vec!["x"; 100].join("\n");
    let model = create_test_model(&text);
    let model = update(model, Message::Scroll(Scroll::Down(5)));
    assert_eq!(model.editor.viewport().top(), 5);
}

#[test]
fn test_resize_leaves_room_for_chrome() {
    let model = create_test_model("x");
    let model = update(model, Message::Resize(100, 30));
    assert_eq!(model.editor.viewport().width(), 100);
    assert_eq!(model.editor.viewport().height(), 28);
}

// --- Quit and save ---

#[test]
fn test_quit_sets_should_quit_when_clean() {
    let model = update(create_test_model("x"), Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_quit_with_unsaved_changes_needs_confirmation() {
    let model = update(create_test_model(""), Message::Key(EditKey::Char('x')));
    let model = update(model, Message::Quit);
    assert!(!model.should_quit);
    assert!(model.quit_confirmed);
    let model = update(model, Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_other_action_resets_quit_confirmation() {
    let model = update(create_test_model(""), Message::Key(EditKey::Char('x')));
    let model = update(model, Message::Quit);
    let model = update(model, Message::Move(Motion::Left, false));
    assert!(!model.quit_confirmed);
}

#[test]
fn test_save_writes_file_and_marks_clean() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sort.txt");
    let app = App::new(Some(path.clone()));
    let (tx, _rx) = mpsc::channel();

    let mut model = Model::open(&path, EditorConfig::default(), (80, 24)).unwrap();
    for ch in "return x".chars() {
        model = update(model, Message::Key(EditKey::Char(ch)));
    }
    let mut model = update(model, Message::Save);
    app.handle_message_side_effects(&mut model, &tx, &Message::Save);

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "return x");
    assert!(!model.editor.is_dirty());
    assert_eq!(model.active_toast(), Some(("Saved sort.txt", ToastLevel::Info)));
}

#[test]
fn test_save_without_file_reports_error() {
    let app = App::new(None);
    let (tx, _rx) = mpsc::channel();
    let mut model = update(create_test_model(""), Message::Key(EditKey::Char('x')));
    app.handle_message_side_effects(&mut model, &tx, &Message::Save);
    let (message, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Error);
    assert!(message.starts_with("Save failed"));
    assert!(model.editor.is_dirty());
}

#[test]
fn test_open_missing_file_starts_empty() {
    let dir = tempdir().unwrap();
    let model = Model::open(&dir.path().join("new.txt"), EditorConfig::default(), (80, 24)).unwrap();
    assert!(model.editor.is_empty());
    assert_eq!(model.title(), "new.txt");
}

#[test]
fn test_open_loads_existing_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gcd.txt");
    std::fs::write(&path, "GCD(a, b)\n    return a").unwrap();
    let model = Model::open(&path, EditorConfig::default(), (80, 24)).unwrap();
    assert_eq!(model.editor.line_count(), 2);
    assert!(!model.editor.is_dirty());
}

#[test]
fn test_untitled_model_title() {
    assert_eq!(create_test_model("").title(), "untitled");
    let model = Model::new(Some(PathBuf::from("dir/algo.txt")), Editor::default(), (80, 24));
    assert_eq!(model.title(), "algo.txt");
}

// --- Analysis ---

#[test]
fn test_analyze_blank_buffer_is_not_sent() {
    let model = update(create_test_model(" \n"), Message::Analyze);
    assert_eq!(model.analysis, AnalysisState::Idle);
    assert_eq!(
        model.active_toast(),
        Some(("Nothing to analyze", ToastLevel::Warning))
    );
}

#[test]
fn test_analyze_round_trip_through_client() {
    let app = App::new(None).with_analysis_client(Arc::new(FixedClient(json!({"steps": 3}))));
    let (tx, rx) = mpsc::channel();

    let mut model = update(create_test_model("x ← 1"), Message::Analyze);
    assert_eq!(model.analysis, AnalysisState::Queued("x ← 1".to_string()));

    app.handle_message_side_effects(&mut model, &tx, &Message::Analyze);
    assert_eq!(model.analysis, AnalysisState::InFlight);

    let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    model.finish_analysis(result);
    assert_eq!(model.analysis, AnalysisState::Idle);
    assert_eq!(model.last_report.as_ref().unwrap().body, json!({"steps": 3}));
    assert_eq!(model.active_toast(), Some(("Analysis: steps", ToastLevel::Info)));
}

#[test]
fn test_analyze_while_running_is_ignored() {
    let mut model = create_test_model("x");
    model.analysis = AnalysisState::InFlight;
    let model = update(model, Message::Analyze);
    assert_eq!(model.analysis, AnalysisState::InFlight);
    assert_eq!(
        model.active_toast(),
        Some(("Analysis already running", ToastLevel::Info))
    );
}

#[test]
fn test_failed_analysis_shows_error_toast() {
    let mut model = create_test_model("x");
    model.analysis = AnalysisState::InFlight;
    model.finish_analysis(Err(AnalysisError::Transport("connection refused".to_string())));
    assert!(!model.analysis_running());
    let (message, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Error);
    assert!(message.contains("connection refused"));
}

#[test]
fn test_drain_analysis_applies_every_result() {
    let (tx, rx) = mpsc::channel();
    let mut model = create_test_model("x");
    model.analysis = AnalysisState::InFlight;
    tx.send(Err(AnalysisError::EmptyInput)).unwrap();
    assert!(App::drain_analysis(&mut model, &rx));
    assert!(!model.analysis_running());
    assert!(!App::drain_analysis(&mut model, &rx));
}

// --- Toasts and help ---

#[test]
fn test_toast_lifecycle() {
    let mut model = create_test_model("");
    model.show_toast(ToastLevel::Info, "hello");
    assert!(!model.expire_toast(Instant::now()));
    assert!(model.active_toast().is_some());
    assert!(model.expire_toast(Instant::now() + Duration::from_secs(5)));
    assert!(model.active_toast().is_none());
}

#[test]
fn test_toggle_help_changes_visibility() {
    let model = update(create_test_model(""), Message::ToggleHelp);
    assert!(model.help_visible);
    let model = update(model, Message::HideHelp);
    assert!(!model.help_visible);
}

// --- Input mapping ---

#[test]
fn test_structural_keys_map_to_edit_keys() {
    let app = App::new(None);
    let model = create_test_model("");
    assert_eq!(app.handle_key(key(KeyCode::Tab), &model), Some(Message::Key(EditKey::Tab)));
    assert_eq!(
        app.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT), &model),
        Some(Message::Key(EditKey::BackTab))
    );
    assert_eq!(app.handle_key(key(KeyCode::Enter), &model), Some(Message::Key(EditKey::Enter)));
    assert_eq!(
        app.handle_key(key(KeyCode::Char('(')), &model),
        Some(Message::Key(EditKey::Char('(')))
    );
}

#[test]
fn test_control_shortcuts() {
    let app = App::new(None);
    let model = create_test_model("");
    assert_eq!(app.handle_key(ctrl('f'), &model), Some(Message::Format));
    assert_eq!(app.handle_key(ctrl('s'), &model), Some(Message::Save));
    assert_eq!(app.handle_key(ctrl('r'), &model), Some(Message::Analyze));
    assert_eq!(app.handle_key(ctrl('q'), &model), Some(Message::Quit));
    assert_eq!(app.handle_key(ctrl('a'), &model), Some(Message::SelectAll));
    assert_eq!(app.handle_key(key(KeyCode::F(1)), &model), Some(Message::ToggleHelp));
}

#[test]
fn test_shift_arrows_extend_selection() {
    let app = App::new(None);
    let model = create_test_model("");
    assert_eq!(
        app.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT), &model),
        Some(Message::Move(Motion::Right, true))
    );
    assert_eq!(
        app.handle_key(
            KeyEvent::new(KeyCode::Left, KeyModifiers::CONTROL | KeyModifiers::SHIFT),
            &model
        ),
        Some(Message::Move(Motion::WordLeft, true))
    );
}

#[test]
fn test_key_release_is_ignored() {
    let app = App::new(None);
    let model = create_test_model("");
    let release = KeyEvent::new_with_kind(KeyCode::Char('x'), KeyModifiers::NONE, KeyEventKind::Release);
    assert_eq!(app.handle_key(release, &model), None);
}

#[test]
fn test_help_mode_any_key_closes_help() {
    let app = App::new(None);
    let mut model = create_test_model("");
    model.help_visible = true;
    assert_eq!(app.handle_key(key(KeyCode::Char('x')), &model), Some(Message::HideHelp));
}

#[test]
fn test_mouse_click_maps_to_text_cell() {
    let app = App::new(None);
    let model = create_test_model("abc\ndef");
    let gutter = gutter_width(model.editor.line_count());
    let msg = app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), gutter + 2, 2), &model);
    assert_eq!(msg, Some(Message::Click(1, 2, false)));
}

#[test]
fn test_mouse_click_on_gutter_or_header_is_ignored() {
    let app = App::new(None);
    let model = create_test_model("abc");
    assert_eq!(app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 0, 1), &model), None);
    assert_eq!(app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 0), &model), None);
}

#[test]
fn test_mouse_wheel_scrolls() {
    let app = App::new(None);
    let model = create_test_model("abc");
    assert_eq!(
        app.handle_mouse(mouse(MouseEventKind::ScrollDown, 10, 5), &model),
        Some(Message::Scroll(Scroll::Down(3)))
    );
    let mut shifted = mouse(MouseEventKind::ScrollDown, 10, 5);
    shifted.modifiers = KeyModifiers::SHIFT;
    assert_eq!(
        app.handle_mouse(shifted, &model),
        Some(Message::Scroll(Scroll::Right(3)))
    );
}

#[test]
fn test_paste_event_maps_to_message() {
    let app = App::new(None);
    let model = create_test_model("");
    let mut debouncer = ResizeDebouncer::new(100);
    assert_eq!(
        app.handle_event(Event::Paste("x".to_string()), &model, 0, &mut debouncer),
        Some(Message::Paste("x".to_string()))
    );
}

#[test]
fn test_resize_event_is_debounced() {
    let app = App::new(None);
    let model = create_test_model("");
    let mut debouncer = ResizeDebouncer::new(100);
    assert_eq!(app.handle_event(Event::Resize(120, 40), &model, 0, &mut debouncer), None);
    assert!(debouncer.is_pending());
}

#[test]
fn test_resize_debouncer_waits_for_quiet_period() {
    let mut debouncer = ResizeDebouncer::new(100);
    debouncer.queue(120, 40, 1_000);
    assert_eq!(debouncer.take_ready(1_050), None);
    assert_eq!(debouncer.take_ready(1_100), Some((120, 40)));
    assert!(!debouncer.is_pending());
}

#[test]
fn test_resize_debouncer_uses_latest_size() {
    let mut debouncer = ResizeDebouncer::new(100);
    debouncer.queue(100, 30, 0);
    debouncer.queue(90, 20, 50);
    assert_eq!(debouncer.take_ready(120), None);
    assert_eq!(debouncer.take_ready(150), Some((90, 20)));
}

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::analysis::{AnalysisError, AnalysisReport};
use crate::editor::{Editor, EditorConfig};

/// Rows taken by the header and the status bar.
pub const CHROME_ROWS: u16 = 2;

const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Where an analysis request stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    /// Accepted by `update`; the side-effect pass still has to send it.
    Queued(String),
    InFlight,
}

/// The complete application state.
pub struct Model {
    pub editor: Editor,
    /// File the buffer is saved to, if any.
    pub file_path: Option<PathBuf>,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    pub help_visible: bool,
    pub should_quit: bool,
    /// Set after first quit attempt with unsaved changes; a second quit proceeds
    pub quit_confirmed: bool,
    pub analysis: AnalysisState,
    /// Last successful analysis response
    pub last_report: Option<AnalysisReport>,
    toast: Option<Toast>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("file_path", &self.file_path)
            .field("editor", &self.editor)
            .field("analysis", &self.analysis)
            .finish_non_exhaustive()
    }
}

impl Model {
    pub fn new(file_path: Option<PathBuf>, mut editor: Editor, terminal_size: (u16, u16)) -> Self {
        editor.resize(terminal_size.0, terminal_size.1.saturating_sub(CHROME_ROWS));
        Self {
            editor,
            file_path,
            config_global_path: None,
            config_local_path: None,
            help_visible: false,
            should_quit: false,
            quit_confirmed: false,
            analysis: AnalysisState::Idle,
            last_report: None,
            toast: None,
        }
    }

    /// Load `path` into a new editor, or start empty if it does not exist.
    pub fn open(path: &Path, config: EditorConfig, terminal_size: (u16, u16)) -> Result<Self> {
        let text = if path.exists() {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?
        } else {
            String::new()
        };
        tracing::debug!(path = %path.display(), bytes = text.len(), "model.open");
        Ok(Self::new(
            Some(path.to_path_buf()),
            Editor::with_text(&text, config),
            terminal_size,
        ))
    }

    /// File name shown in the header.
    pub fn title(&self) -> String {
        self.file_path
            .as_deref()
            .and_then(Path::file_name)
            .map_or_else(|| "untitled".to_string(), |name| name.to_string_lossy().into_owned())
    }

    pub const fn analysis_running(&self) -> bool {
        matches!(self.analysis, AnalysisState::Queued(_) | AnalysisState::InFlight)
    }

    /// Hand a queued request to the caller and mark it in flight.
    pub(super) fn take_queued_analysis(&mut self) -> Option<String> {
        if !matches!(self.analysis, AnalysisState::Queued(_)) {
            return None;
        }
        match std::mem::replace(&mut self.analysis, AnalysisState::InFlight) {
            AnalysisState::Queued(text) => Some(text),
            _ => None,
        }
    }

    /// Record a finished analysis.
    pub fn finish_analysis(&mut self, result: Result<AnalysisReport, AnalysisError>) {
        self.analysis = AnalysisState::Idle;
        match result {
            Ok(report) => {
                self.show_toast(ToastLevel::Info, report.summary());
                self.last_report = Some(report);
            }
            Err(err) => self.show_toast(ToastLevel::Error, err.to_string()),
        }
    }

    /// Write the buffer to `file_path` and mark it clean.
    pub(super) fn save(&mut self) -> Result<PathBuf> {
        let path = self
            .file_path
            .clone()
            .context("No file to save to; start pseudopad with a FILE argument")?;
        std::fs::write(&path, self.editor.text())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        self.editor.mark_clean();
        Ok(path)
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(None, Editor::default(), (80, 24))
    }
}

//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{AnalysisState, CHROME_ROWS, Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;
use std::sync::Arc;

use crate::analysis::{AnalysisClient, HttpAnalysisClient};
use crate::config::DEFAULT_ANALYSIS_URL;
use crate::editor::EditorConfig;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: Option<PathBuf>,
    editor_config: EditorConfig,
    analysis_client: Arc<dyn AnalysisClient>,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create an application editing `file_path`, or an unsaved scratch
    /// buffer when `None`.
    pub fn new(file_path: Option<PathBuf>) -> Self {
        Self {
            file_path,
            editor_config: EditorConfig::default(),
            analysis_client: Arc::new(HttpAnalysisClient::new(DEFAULT_ANALYSIS_URL)),
            config_global_path: None,
            config_local_path: None,
        }
    }

    pub fn with_editor_config(mut self, config: EditorConfig) -> Self {
        self.editor_config = config;
        self
    }

    /// Point the analysis request at a different service.
    pub fn with_analysis_url(self, base_url: &str) -> Self {
        self.with_analysis_client(Arc::new(HttpAnalysisClient::new(base_url)))
    }

    pub fn with_analysis_client(mut self, client: Arc<dyn AnalysisClient>) -> Self {
        self.analysis_client = client;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

#[cfg(test)]
mod tests;

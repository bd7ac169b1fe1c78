use std::sync::mpsc::Sender;

use crate::analysis::{spawn_analysis, AnalysisError, AnalysisReport};
use crate::app::{App, Message, Model, ToastLevel};

pub(super) type AnalysisResult = Result<AnalysisReport, AnalysisError>;

impl App {
    /// Perform the I/O that `update` only records.
    pub(super) fn handle_message_side_effects(
        &self,
        model: &mut Model,
        analysis_tx: &Sender<AnalysisResult>,
        msg: &Message,
    ) {
        match msg {
            Message::Save => match model.save() {
                Ok(path) => {
                    tracing::debug!(path = %path.display(), "file.saved");
                    model.show_toast(ToastLevel::Info, format!("Saved {}", model.title()));
                }
                Err(err) => {
                    tracing::debug!(error = %err, "file.save_failed");
                    model.show_toast(ToastLevel::Error, format!("Save failed: {err:#}"));
                }
            },
            Message::Analyze => {
                if let Some(text) = model.take_queued_analysis() {
                    spawn_analysis(self.analysis_client.clone(), text, analysis_tx.clone());
                }
            }
            _ => {}
        }
    }
}

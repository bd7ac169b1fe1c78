use std::io::stdout;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};
use crate::editor::Editor;

use super::effects::AnalysisResult;

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Run the editor until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the terminal cannot be
    /// initialized, or the event loop hits an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; pseudopad requires an interactive terminal")?;
        let size = terminal.size()?;
        let terminal_size = (size.width, size.height);

        let model = match &self.file_path {
            Some(path) => Model::open(path, self.editor_config.clone(), terminal_size),
            None => Ok(Model::new(
                None,
                Editor::new(self.editor_config.clone()),
                terminal_size,
            )),
        };
        let result = model.and_then(|mut model| {
            model
                .config_global_path
                .clone_from(&self.config_global_path);
            model.config_local_path.clone_from(&self.config_local_path);
            execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
            self.event_loop(&mut terminal, &mut model)
        });

        let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
        ratatui::restore();
        result
    }

    fn event_loop(&self, terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let (analysis_tx, analysis_rx) = mpsc::channel::<AnalysisResult>();
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }
            if Self::drain_analysis(model, &analysis_rx) {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                tracing::trace!(frame = frame_idx, width, height, "event.resize.apply");
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            let poll_ms = if needs_render {
                0
            } else if resize_debouncer.is_pending() || model.analysis_running() {
                10
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Coalesce key repeat bursts into a single render.
                let mut handled = 0_u32;
                loop {
                    let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    let msg = self.handle_event(event::read()?, model, event_ms, &mut resize_debouncer);
                    if let Some(msg) = msg {
                        tracing::trace!(frame = frame_idx, ?msg, "event.message");
                        handled += 1;
                        let side_msg = msg.clone();
                        *model = update(std::mem::take(model), msg);
                        self.handle_message_side_effects(model, &analysis_tx, &side_msg);
                        needs_render = true;
                    }
                    if model.should_quit || !event::poll(Duration::from_millis(0))? {
                        break;
                    }
                }
                if handled > 1 {
                    tracing::trace!(frame = frame_idx, handled, "event.drain");
                }
            }

            if needs_render {
                frame_idx += 1;
                terminal.draw(|frame| self.view(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }

    /// Apply any finished analysis results. Returns `true` if one arrived.
    pub(super) fn drain_analysis(model: &mut Model, results: &Receiver<AnalysisResult>) -> bool {
        let mut received = false;
        while let Ok(result) = results.try_recv() {
            model.finish_analysis(result);
            received = true;
        }
        received
    }
}

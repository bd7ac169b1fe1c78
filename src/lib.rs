// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. analysis::AnalysisError)
    clippy::module_name_repetitions
)]

//! # Pseudopad
//!
//! A terminal editor for textbook-style pseudocode.
//!
//! Pseudopad edits algorithm pseudocode with:
//! - Live syntax highlighting (keywords, built-ins, procedures, arrays)
//! - Structural keys: block indent/outdent, auto-indent, bracket pairs
//! - An indentation normalizer that rewrites blocks in a canonical unit
//! - Optional submission of the buffer to an analysis service
//!
//! ## Architecture
//!
//! Pseudopad uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`editor`]: Text buffer, keystroke rules and shared viewport
//! - [`highlight`]: Pseudocode tokenizer and markup renderer
//! - [`format`]: Indentation normalizer
//! - [`indent`]: Indentation unit helpers
//! - [`analysis`]: Client for the analysis service
//! - [`config`]: Command-line and rc-file settings
//! - [`ui`]: Terminal UI components

pub mod analysis;
pub mod app;
pub mod config;
pub mod editor;
pub mod format;
pub mod highlight;
pub mod indent;
pub mod logging;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::editor::{EditKey, Editor, EditorConfig, Viewport};
    pub use crate::format::format_pseudocode;
    pub use crate::highlight::{to_markup, tokenize_line};
    pub use crate::indent::IndentUnit;
}

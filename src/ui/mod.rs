//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`render`]: Header, gutter, highlighted text and caret
//! - [`style`]: Token palette and chrome colors

pub mod style;

mod overlays;
mod render;
mod status;

pub use overlays::centered_popup_rect;
pub use render::{render, split_chrome};

//! Dialog components for TUI

mod base;
mod error_dialog;
mod progress_dialog;

pub use error_dialog::render_error_dialog;
pub use progress_dialog::{render_progress_dialog, spinner_frame};

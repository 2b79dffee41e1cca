//! Spinner dialog shown while an effect is running

use super::base::{render_dialog, DialogConfig};
use ratatui::{layout::Rect, style::Color, Frame};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner glyph for the given animation tick
pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick % SPINNER_FRAMES.len() as u64) as usize]
}

pub fn render_progress_dialog(frame: &mut Frame, area: Rect, message: &str, tick: u64) {
    let text = format!("{} {message}", spinner_frame(tick));
    render_dialog(
        frame,
        area,
        DialogConfig {
            border_color: Color::Cyan,
            message: &text,
            ..Default::default()
        },
    );
}

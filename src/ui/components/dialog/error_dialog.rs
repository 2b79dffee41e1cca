//! Error dialog component

use super::base::{render_dialog, DialogConfig};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    Frame,
};

fn key_span(key: &str) -> Span<'_> {
    Span::styled(
        key,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )
}

/// Render the error view: message plus retry/back/quit hints.
/// `can_go_back` adds the `esc` hint when a ticket list exists to return to.
pub fn render_error_dialog(frame: &mut Frame, area: Rect, error_message: &str, can_go_back: bool) {
    let mut hint = vec![key_span("r"), Span::raw(" retry  ")];
    if can_go_back {
        hint.push(key_span("esc"));
        hint.push(Span::raw(" back  "));
    }
    hint.push(key_span("q"));
    hint.push(Span::raw(" quit"));

    render_dialog(
        frame,
        area,
        DialogConfig {
            title: "Error",
            title_color: Color::Red,
            border_color: Color::Red,
            message: error_message,
            hint: Some(hint),
            max_width: 70,
        },
    );
}

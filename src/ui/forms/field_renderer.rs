//! Field rendering utilities for forms

use crate::state::FormField;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn focus_style(is_active: bool) -> Style {
    if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Draw a single-line text field; empty fields show their placeholder
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FormField, is_active: bool) {
    let display_value = field.display_value();
    let cursor = if is_active { "▌" } else { "" };

    let value_span = if display_value.is_empty() {
        Span::styled(
            field.placeholder.as_str(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::styled(display_value, Style::default().fg(Color::White))
    };

    let content = Paragraph::new(Line::from(vec![
        value_span,
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]));

    let block = Block::default()
        .title(format!(" {} ", field.label))
        .borders(Borders::ALL)
        .border_style(focus_style(is_active));

    frame.render_widget(content.block(block), area);
}

/// Draw a yes/no toggle in the same boxed style as text fields
pub fn draw_toggle(frame: &mut Frame, area: Rect, label: &str, value: bool, is_active: bool) {
    let (mark, color) = if value {
        ("[x] yes", Color::Green)
    } else {
        ("[ ] no", Color::Yellow)
    };
    let mut spans = vec![Span::styled(mark, Style::default().fg(color))];
    if is_active {
        spans.push(Span::styled(
            "  (space/y/n)",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let block = Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(focus_style(is_active));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Inline error line under a form
pub fn draw_form_error(frame: &mut Frame, area: Rect, message: &str) {
    let line = Line::from(Span::styled(
        format!("✗ {message}"),
        Style::default().fg(Color::Red),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

//! Credential entry form

use super::field_renderer::{draw_field, draw_form_error};
use crate::state::{CredentialsForm, Form};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const TOKEN_HELP_URL: &str = "https://id.atlassian.com/manage-profile/security/api-tokens";
const FORM_WIDTH: u16 = 64;
const FORM_HEIGHT: u16 = 17;

pub fn draw(frame: &mut Frame, area: Rect, form: &CredentialsForm) {
    let width = FORM_WIDTH.min(area.width);
    let height = FORM_HEIGHT.min(area.height);
    let form_area = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    let block = Block::default()
        .title(Span::styled(
            " Connect to Jira ",
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(form_area);
    frame.render_widget(block, form_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Atlassian URL
            Constraint::Length(3), // Email
            Constraint::Length(3), // API token
            Constraint::Length(1), // Error
            Constraint::Min(0),    // Help
        ])
        .margin(1)
        .split(inner);

    for (idx, field) in form.fields().into_iter().enumerate() {
        draw_field(frame, chunks[idx], field, form.active_field() == idx);
    }

    if let Some(error) = &form.error {
        draw_form_error(frame, chunks[3], &error.to_string());
    }

    let help = Paragraph::new(vec![
        Line::from(Span::styled(
            "Create an API token at:",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(TOKEN_HELP_URL, Style::default().fg(Color::Blue))),
    ]);
    frame.render_widget(help, chunks[4]);
}

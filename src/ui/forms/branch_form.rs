//! Branch form with ticket details sidebar

use super::field_renderer::{draw_field, draw_form_error, draw_toggle};
use crate::state::{BranchForm, Form, Viewport};
use crate::time_fmt::format_relative_time;
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Below this terminal width the sidebar is dropped
const SIDEBAR_MIN_WIDTH: u16 = 70;

pub fn draw(
    frame: &mut Frame,
    area: Rect,
    form: &BranchForm,
    viewport: Viewport,
    now: DateTime<Utc>,
) {
    if viewport.width >= SIDEBAR_MIN_WIDTH {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(30)])
            .split(area);
        draw_form(frame, chunks[0], form);
        draw_sidebar(frame, chunks[1], form, now);
    } else {
        draw_form(frame, area, form);
    }
}

fn draw_form(frame: &mut Frame, area: Rect, form: &BranchForm) {
    let block = Block::default()
        .title(format!(" Create branch for {} ", form.ticket.key))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Branch name
            Constraint::Length(3), // Mark in progress
            Constraint::Length(1), // Error
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    draw_field(
        frame,
        chunks[0],
        &form.branch_name,
        form.active_field() == 0,
    );

    match form.mark_in_progress {
        Some(mark) => draw_toggle(
            frame,
            chunks[1],
            "Mark ticket as In Progress",
            mark,
            form.is_toggle_active(),
        ),
        None => frame.render_widget(
            Paragraph::new(Span::styled(
                " Ticket is already in progress",
                Style::default().fg(Color::DarkGray),
            )),
            chunks[1],
        ),
    }

    if let Some(error) = &form.error {
        draw_form_error(frame, chunks[2], &error.to_string());
    }
}

fn draw_sidebar(frame: &mut Frame, area: Rect, form: &BranchForm, now: DateTime<Utc>) {
    let ticket = &form.ticket;
    let label = Style::default().fg(Color::DarkGray);

    let lines = vec![
        Line::from(Span::styled(
            ticket.summary.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Key:     ", label),
            Span::styled(ticket.key.as_str(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("Type:    ", label),
            Span::raw(ticket.issue_type.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Status:  ", label),
            Span::raw(ticket.status.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Created: ", label),
            Span::raw(format_relative_time(&ticket.created_at, now)),
        ]),
    ];

    let sidebar = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Ticket ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(sidebar, area);
}

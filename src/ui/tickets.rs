//! Ticket list view with search bar

use super::widgets::{fit, render_scrollable_list};
use crate::state::{AppState, Mode, Ticket};
use crate::time_fmt::format_relative_time;
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

const KEY_WIDTH: usize = 12;
const TYPE_WIDTH: usize = 10;
const STATUS_WIDTH: usize = 14;
const CREATED_WIDTH: usize = 16;
/// Selection marker plus the spaces between columns
const ROW_OVERHEAD: usize = 2 + 4;

fn summary_width(area: Rect) -> usize {
    let inner = area.width.saturating_sub(2) as usize;
    inner
        .saturating_sub(KEY_WIDTH + TYPE_WIDTH + STATUS_WIDTH + CREATED_WIDTH + ROW_OVERHEAD)
        .max(10)
}

fn status_color(status: &str) -> Color {
    match status.to_ascii_lowercase().as_str() {
        "in progress" => Color::Yellow,
        "in review" | "review" => Color::Magenta,
        "blocked" => Color::Red,
        _ => Color::Gray,
    }
}

fn header_line(summary_width: usize) -> Line<'static> {
    let style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::BOLD);
    Line::from(Span::styled(
        format!(
            "  {} {} {} {} {}",
            fit("Key", KEY_WIDTH),
            fit("Type", TYPE_WIDTH),
            fit("Summary", summary_width),
            fit("Status", STATUS_WIDTH),
            fit("Created", CREATED_WIDTH),
        ),
        style,
    ))
}

fn ticket_row(
    ticket: &Ticket,
    is_selected: bool,
    summary_width: usize,
    now: DateTime<Utc>,
) -> ListItem<'static> {
    let prefix = if is_selected { "▸ " } else { "  " };
    let type_color = if ticket.is_bug() {
        Color::Red
    } else {
        Color::Green
    };
    let summary_style = if is_selected {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    ListItem::new(Line::from(vec![
        Span::styled(prefix, Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("{} ", fit(&ticket.key, KEY_WIDTH)),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{} ", fit(&ticket.issue_type, TYPE_WIDTH)),
            Style::default().fg(type_color),
        ),
        Span::styled(
            format!("{} ", fit(&ticket.summary, summary_width)),
            summary_style,
        ),
        Span::styled(
            format!("{} ", fit(&ticket.status, STATUS_WIDTH)),
            Style::default().fg(status_color(&ticket.status)),
        ),
        Span::styled(
            fit(&format_relative_time(&ticket.created_at, now), CREATED_WIDTH),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
}

/// Draw the search bar and the ticket table
pub fn draw_list(frame: &mut Frame, area: Rect, state: &AppState, now: DateTime<Utc>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    draw_search_bar(frame, chunks[0], state);

    let title = if state.search_term.is_empty() {
        format!(" My tickets ({}) ", state.all_tickets.len())
    } else {
        format!(
            " My tickets ({} of {}) ",
            state.visible_tickets.len(),
            state.all_tickets.len()
        )
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if state.visible_tickets.is_empty() {
        let message = if state.all_tickets.is_empty() {
            "No open tickets assigned to you.\nPress 'r' to refresh."
        } else {
            "No tickets match the search.\nPress '/' to change it."
        };
        let content = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(content, chunks[1]);
        return;
    }

    let summary_width = summary_width(chunks[1]);
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    let table = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    frame.render_widget(Paragraph::new(header_line(summary_width)), table[0]);

    let items: Vec<ListItem> = state
        .visible_tickets
        .iter()
        .enumerate()
        .map(|(idx, ticket)| ticket_row(ticket, idx == state.selected_index, summary_width, now))
        .collect();

    let list = List::new(items).highlight_style(Style::default().bg(Color::Rgb(30, 30, 40)));
    render_scrollable_list(frame, table[1], list, state.selected_index);
}

fn draw_search_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let editing = state.mode == Mode::SearchEditing;
    let (text, style) = if editing {
        (
            format!("{}▌", state.pending_search_input),
            Style::default().fg(Color::White),
        )
    } else if state.search_term.is_empty() {
        (
            "press / to search".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (state.search_term.clone(), Style::default().fg(Color::Yellow))
    };
    let border = if editing { Color::Cyan } else { Color::DarkGray };

    let bar = Paragraph::new(Line::from(Span::styled(text, style))).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(bar, area);
}

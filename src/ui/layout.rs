//! Screen layout and the status bar

use super::components::spinner_frame;
use crate::effects::EffectKind;
use crate::state::{AppState, Mode};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into content and a one-line status bar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);
    (chunks[0], chunks[1])
}

/// Key hints for the current mode
pub fn mode_hints(state: &AppState) -> &'static str {
    match state.mode {
        Mode::AwaitingCredentials if state.credentials_form.is_none() => "",
        Mode::AwaitingCredentials => "tab/↓:next  shift+tab/↑:prev  enter:next/submit",
        Mode::Loading | Mode::Submitting => "please wait",
        Mode::TicketList => "j/k:move  g/G:top/bottom  enter:branch  /:search  r:refresh  S:sign out  q:quit",
        Mode::SearchEditing => "enter:apply  esc:cancel",
        Mode::BranchForm => "tab:next field  enter:next/create  esc:back",
        Mode::Error => "r:retry  q:quit",
    }
}

/// Message shown while an effect is in flight
pub fn busy_message(kind: EffectKind) -> &'static str {
    match kind {
        EffectKind::LoadCredentials | EffectKind::ValidateCredentials => {
            "Validating credentials..."
        }
        EffectKind::ClearCredentials => "Signing out...",
        EffectKind::FetchTickets => "Loading tickets...",
        EffectKind::SubmitBranch => "Creating branch...",
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![];

    match state.in_flight {
        Some(kind) => spans.push(Span::styled(
            format!(" {} {} ", spinner_frame(state.tick), busy_message(kind)),
            Style::default().fg(Color::Yellow),
        )),
        None if state.credentials.is_some() => {
            spans.push(Span::styled(" ● ", Style::default().fg(Color::Green)))
        }
        None => spans.push(Span::styled(" ○ ", Style::default().fg(Color::Red))),
    }

    spans.push(Span::styled(
        mode_hints(state),
        Style::default().fg(Color::Gray),
    ));

    if let Some(credentials) = &state.credentials {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            credentials.email.as_str(),
            Style::default().fg(Color::Blue),
        ));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    // Quit hint on the right
    let quit_hint = " ^C:quit ";
    let width = quit_hint.len() as u16;
    if area.width > width {
        let quit_area = Rect {
            x: area.x + area.width - width,
            y: area.y,
            width,
            height: 1,
        };
        let quit_widget =
            Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
        frame.render_widget(quit_widget, quit_area);
    }
}

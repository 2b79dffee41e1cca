//! UI module for rendering the TUI.
//!
//! Rendering is a pure function of [`AppState`]; nothing here mutates state
//! or produces events.

mod components;
mod forms;
mod layout;
mod tickets;
mod widgets;

use crate::app::can_return_to_list;
use crate::state::{AppState, Mode};
use chrono::Utc;
use components::{render_error_dialog, render_progress_dialog};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, state: &AppState) {
    let now = Utc::now();
    let (main_area, status_area) = layout::create_layout(frame.area());

    match state.mode {
        Mode::AwaitingCredentials => match &state.credentials_form {
            Some(form) => forms::draw_credentials_form(frame, main_area, form),
            None => draw_busy(frame, main_area, state),
        },
        Mode::Loading => {
            if !state.all_tickets.is_empty() {
                tickets::draw_list(frame, main_area, state, now);
            }
            draw_busy(frame, main_area, state);
        }
        Mode::TicketList | Mode::SearchEditing => {
            tickets::draw_list(frame, main_area, state, now)
        }
        Mode::BranchForm => {
            if let Some(form) = &state.branch_form {
                forms::draw_branch_form(frame, main_area, form, state.viewport, now);
            }
        }
        Mode::Submitting => draw_busy(frame, main_area, state),
        Mode::Error => {
            if !state.all_tickets.is_empty() {
                tickets::draw_list(frame, main_area, state, now);
            }
            let message = state
                .last_error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "Unknown error".to_string());
            render_error_dialog(frame, main_area, &message, can_return_to_list(state));
        }
    }

    layout::draw_status_bar(frame, status_area, state);
}

fn draw_busy(frame: &mut Frame, area: ratatui::layout::Rect, state: &AppState) {
    if let Some(kind) = state.in_flight {
        render_progress_dialog(frame, area, layout::busy_message(kind), state.tick);
    }
}

//! Application state definitions

use super::forms::{BranchForm, CredentialsForm};
use crate::effects::{Effect, EffectKind};
use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Status name that marks a ticket as already being worked on
pub const IN_PROGRESS_STATUS: &str = "In Progress";

/// Current mode of the application state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Startup credential check, or the credential-entry form
    #[default]
    AwaitingCredentials,
    Loading,
    Error,
    TicketList,
    SearchEditing,
    BranchForm,
    Submitting,
}

impl Mode {
    /// Effect kinds whose completion is meaningful in this mode.
    /// Completions of any other kind are stale and get dropped.
    pub fn expects(&self, kind: EffectKind) -> bool {
        match self {
            Self::AwaitingCredentials => matches!(
                kind,
                EffectKind::LoadCredentials | EffectKind::ClearCredentials
            ),
            Self::Loading => matches!(
                kind,
                EffectKind::ValidateCredentials | EffectKind::FetchTickets
            ),
            Self::Submitting => kind == EffectKind::SubmitBranch,
            Self::Error | Self::TicketList | Self::SearchEditing | Self::BranchForm => false,
        }
    }
}

/// Jira connection details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
}

impl Credentials {
    /// Build credentials from raw user input: trims every field, strips a
    /// trailing slash from the URL and assumes https when no scheme is given.
    pub fn from_input(base_url: &str, email: &str, api_token: &str) -> Self {
        let mut url = base_url.trim().trim_end_matches('/').to_string();
        if !url.is_empty() && !url.contains("://") {
            url = format!("https://{url}");
        }
        Self {
            base_url: url,
            email: email.trim().to_string(),
            api_token: api_token.trim().to_string(),
        }
    }
}

/// Values used to pre-fill the credential form on first run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialPrefill {
    pub base_url: Option<String>,
    pub email: Option<String>,
    pub api_token: Option<String>,
}

/// A Jira issue assigned to the current user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub key: String,
    pub issue_type: String,
    pub summary: String,
    pub status: String,
    /// Raw creation timestamp as returned by Jira
    pub created_at: String,
}

impl Ticket {
    pub fn is_bug(&self) -> bool {
        self.issue_type == "Bug"
    }

    pub fn is_in_progress(&self) -> bool {
        self.status.eq_ignore_ascii_case(IN_PROGRESS_STATUS)
    }
}

/// Last known terminal size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

/// Main application state. Owned by the event loop and replaced wholesale
/// on every reducer call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub mode: Mode,

    // Session
    pub credentials: Option<Credentials>,
    pub prefill: CredentialPrefill,

    // Data
    pub all_tickets: Vec<Ticket>,
    pub visible_tickets: Vec<Ticket>,

    // Search
    pub search_term: String,
    pub pending_search_input: String,

    // Selection
    pub selected_index: usize,

    // Forms
    pub credentials_form: Option<CredentialsForm>,
    pub branch_form: Option<BranchForm>,

    // Effects
    pub in_flight: Option<EffectKind>,
    pub last_error: Option<AppError>,
    pub retry: Option<Effect>,

    // UI state
    pub viewport: Viewport,
    pub tick: u64,

    // Exit
    pub quit: bool,
    pub checked_out_branch: Option<String>,
}

impl AppState {
    pub fn new(prefill: CredentialPrefill) -> Self {
        Self {
            prefill,
            ..Default::default()
        }
    }

    /// Move selection down
    pub fn move_selection_down(&mut self) {
        let max = self.visible_tickets.len();
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Jump to the last ticket
    pub fn select_last(&mut self) {
        self.selected_index = self.visible_tickets.len().saturating_sub(1);
    }

    /// Reset selection
    pub fn reset_selection(&mut self) {
        self.selected_index = 0;
    }

    /// Clamp the selection after the visible list changed
    pub fn clamp_selection(&mut self) {
        let len = self.visible_tickets.len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    /// Currently highlighted ticket, if the list is non-empty
    pub fn selected_ticket(&self) -> Option<&Ticket> {
        self.visible_tickets.get(self.selected_index)
    }

    /// True while an effect is running that the user is waiting on
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }
}

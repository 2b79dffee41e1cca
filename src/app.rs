//! The application reducer.
//!
//! [`reduce`] is the only place `AppState` changes. It never performs I/O;
//! background work is requested by returning an [`Effect`], whose single
//! completion comes back later as [`Event::Completed`].

use crate::effects::{Effect, EffectKind};
use crate::error::{AppError, ErrorKind};
use crate::event::{EffectOutcome, Event};
use crate::filter::filter_tickets;
use crate::state::{
    AppState, BranchForm, CredentialPrefill, CredentialsForm, Form, Mode, Viewport,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info, warn};

/// Initial state plus the startup credential check
pub fn init(prefill: CredentialPrefill) -> (AppState, Option<Effect>) {
    let mut state = AppState::new(prefill);
    let effect = begin(
        &mut state,
        Mode::AwaitingCredentials,
        Effect::LoadAndValidateCredentials,
    );
    (state, effect)
}

/// Advance `state` by one event
pub fn reduce(mut state: AppState, event: Event) -> (AppState, Option<Effect>) {
    let effect = match event {
        Event::Key(key) => handle_key(&mut state, key),
        Event::Resize { width, height } => {
            state.viewport = Viewport { width, height };
            None
        }
        Event::Tick => {
            state.tick = state.tick.wrapping_add(1);
            None
        }
        Event::Completed { kind, outcome } => handle_completion(&mut state, kind, outcome),
    };
    (state, effect)
}

/// Enter `mode` and mark `effect` as the one in flight
fn begin(state: &mut AppState, mode: Mode, effect: Effect) -> Option<Effect> {
    state.mode = mode;
    state.in_flight = Some(effect.kind());
    state.last_error = None;
    state.retry = Some(effect.clone());
    Some(effect)
}

fn fail(state: &mut AppState, error: AppError) -> Option<Effect> {
    state.mode = Mode::Error;
    state.last_error = Some(error);
    None
}

/// Mode an effect runs in, used when retrying it from the error view
fn mode_for(kind: EffectKind) -> Mode {
    match kind {
        EffectKind::LoadCredentials | EffectKind::ClearCredentials => Mode::AwaitingCredentials,
        EffectKind::ValidateCredentials | EffectKind::FetchTickets => Mode::Loading,
        EffectKind::SubmitBranch => Mode::Submitting,
    }
}

fn refilter(state: &mut AppState) {
    state.visible_tickets = filter_tickets(&state.all_tickets, &state.search_term);
}

fn show_credentials_form(state: &mut AppState, error: Option<AppError>) {
    let mut form = state
        .credentials_form
        .take()
        .unwrap_or_else(|| CredentialsForm::new(&state.prefill));
    form.error = error;
    state.credentials_form = Some(form);
    state.mode = Mode::AwaitingCredentials;
    state.retry = None;
}

/// The tracker rejected the session's token: drop the session and ask again,
/// keeping the URL and email
fn expire_session(state: &mut AppState, error: AppError) {
    if let Some(credentials) = state.credentials.take() {
        state.credentials_form = Some(CredentialsForm::new(&CredentialPrefill {
            base_url: Some(credentials.base_url),
            email: Some(credentials.email),
            api_token: None,
        }));
    }
    state.branch_form = None;
    state.all_tickets.clear();
    state.visible_tickets.clear();
    state.reset_selection();
    show_credentials_form(state, Some(error));
}

fn fetch_tickets(state: &mut AppState) -> Option<Effect> {
    let credentials = state.credentials.clone()?;
    begin(state, Mode::Loading, Effect::FetchTickets(credentials))
}

// ============================================================================
// Effect completions
// ============================================================================

fn handle_completion(
    state: &mut AppState,
    kind: EffectKind,
    outcome: EffectOutcome,
) -> Option<Effect> {
    if !state.mode.expects(kind) || state.in_flight != Some(kind) {
        debug!(?kind, mode = ?state.mode, "dropping stale effect result");
        return None;
    }
    state.in_flight = None;

    match (kind, outcome) {
        (EffectKind::LoadCredentials, EffectOutcome::CredentialsReady(credentials))
        | (EffectKind::ValidateCredentials, EffectOutcome::CredentialsReady(credentials)) => {
            info!(base_url = %credentials.base_url, "credentials accepted");
            state.credentials_form = None;
            state.credentials = Some(credentials);
            fetch_tickets(state)
        }
        (EffectKind::LoadCredentials, EffectOutcome::CredentialsNeeded) => {
            show_credentials_form(state, None);
            None
        }
        (EffectKind::LoadCredentials, EffectOutcome::Failed(error)) => {
            show_credentials_form(state, Some(error));
            None
        }
        (EffectKind::ValidateCredentials, EffectOutcome::Failed(error))
            if error.kind() == ErrorKind::Credential =>
        {
            show_credentials_form(state, Some(error));
            None
        }
        (EffectKind::ClearCredentials, EffectOutcome::CredentialsCleared) => {
            state.retry = None;
            None
        }
        (EffectKind::ClearCredentials, EffectOutcome::Failed(error)) => {
            show_credentials_form(state, Some(error));
            None
        }
        (EffectKind::FetchTickets, EffectOutcome::TicketsLoaded(tickets)) => {
            info!(count = tickets.len(), "tickets loaded");
            state.all_tickets = tickets;
            refilter(state);
            state.clamp_selection();
            state.mode = Mode::TicketList;
            state.retry = None;
            None
        }
        (EffectKind::SubmitBranch, EffectOutcome::BranchReady { branch_name, outcome }) => {
            info!(%branch_name, ?outcome, "branch ready");
            state.branch_form = None;
            state.retry = None;
            state.checked_out_branch = Some(branch_name);
            state.quit = true;
            None
        }
        (_, EffectOutcome::Failed(error)) if error.kind() == ErrorKind::Credential => {
            warn!(?kind, "session credentials rejected");
            expire_session(state, error);
            None
        }
        (EffectKind::SubmitBranch, EffectOutcome::Failed(error)) => {
            state.branch_form = None;
            fail(state, error)
        }
        (
            EffectKind::SubmitBranch,
            EffectOutcome::CheckoutFailed {
                error,
                ticket_marked,
            },
        ) => {
            // The transition already went through; a retry only repeats the checkout
            if ticket_marked {
                if let Some(Effect::SubmitBranchForm {
                    mark_in_progress, ..
                }) = state.retry.as_mut()
                {
                    *mark_in_progress = false;
                }
            }
            state.branch_form = None;
            fail(state, error)
        }
        (_, EffectOutcome::Failed(error)) => fail(state, error),
        (kind, _) => {
            warn!(?kind, "unexpected effect outcome");
            None
        }
    }
}

// ============================================================================
// Keyboard
// ============================================================================

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Option<Effect> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if is_ctrl_c(&key) {
        state.quit = true;
        return None;
    }

    match state.mode {
        Mode::AwaitingCredentials => handle_credentials_key(state, key),
        Mode::TicketList => handle_ticket_list_key(state, key),
        Mode::SearchEditing => handle_search_key(state, key),
        Mode::BranchForm => handle_branch_form_key(state, key),
        Mode::Error => handle_error_key(state, key),
        Mode::Loading | Mode::Submitting => None,
    }
}

/// Typed character, ignoring chords with ctrl/alt
fn typed_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(c)
        }
        _ => None,
    }
}

fn handle_credentials_key(state: &mut AppState, key: KeyEvent) -> Option<Effect> {
    // Startup check still running: no form yet
    let busy = state.is_busy();
    let form = state.credentials_form.as_mut()?;

    match key.code {
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Backspace => {
            if let Some(field) = form.get_active_field_mut() {
                field.pop_char();
            }
        }
        KeyCode::Enter if !form.is_last_field() => form.next_field(),
        KeyCode::Enter => {
            if busy {
                return None;
            }
            return match form.validate() {
                Ok(credentials) => {
                    form.error = None;
                    begin(
                        state,
                        Mode::Loading,
                        Effect::ValidateAndStoreCredentials(credentials),
                    )
                }
                Err(error) => {
                    debug!(%error, "credential form rejected");
                    form.error = Some(error);
                    None
                }
            };
        }
        _ => {
            if let Some(c) = typed_char(&key) {
                if let Some(field) = form.get_active_field_mut() {
                    field.push_char(c);
                }
            }
        }
    }
    None
}

fn handle_ticket_list_key(state: &mut AppState, key: KeyEvent) -> Option<Effect> {
    match key.code {
        KeyCode::Char('q') => state.quit = true,
        KeyCode::Char('j') | KeyCode::Down => state.move_selection_down(),
        KeyCode::Char('k') | KeyCode::Up => state.move_selection_up(),
        KeyCode::Char('g') | KeyCode::Home => state.reset_selection(),
        KeyCode::Char('G') | KeyCode::End => state.select_last(),
        KeyCode::Enter => {
            if let Some(ticket) = state.selected_ticket() {
                state.branch_form = Some(BranchForm::for_ticket(ticket));
                state.mode = Mode::BranchForm;
            }
        }
        KeyCode::Char('/') => {
            state.pending_search_input = state.search_term.clone();
            state.mode = Mode::SearchEditing;
        }
        KeyCode::Char('r') => return fetch_tickets(state),
        KeyCode::Char('S') => {
            info!("signing out");
            state.credentials = None;
            state.all_tickets.clear();
            state.visible_tickets.clear();
            state.search_term.clear();
            state.reset_selection();
            state.credentials_form = Some(CredentialsForm::new(&state.prefill));
            return begin(state, Mode::AwaitingCredentials, Effect::ClearCredentials);
        }
        _ => {}
    }
    None
}

fn handle_search_key(state: &mut AppState, key: KeyEvent) -> Option<Effect> {
    match key.code {
        KeyCode::Enter => {
            state.search_term = std::mem::take(&mut state.pending_search_input);
            refilter(state);
            state.reset_selection();
            state.mode = Mode::TicketList;
        }
        KeyCode::Esc => {
            state.pending_search_input.clear();
            state.mode = Mode::TicketList;
        }
        KeyCode::Backspace => {
            state.pending_search_input.pop();
        }
        _ => {
            if let Some(c) = typed_char(&key) {
                state.pending_search_input.push(c);
            }
        }
    }
    None
}

fn handle_branch_form_key(state: &mut AppState, key: KeyEvent) -> Option<Effect> {
    if key.code == KeyCode::Esc {
        state.branch_form = None;
        state.mode = Mode::TicketList;
        return None;
    }

    let form = state.branch_form.as_mut()?;
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Enter if !form.is_last_field() => form.next_field(),
        KeyCode::Enter => {
            let submission = match form.validate() {
                Ok(submission) => submission,
                Err(error) => {
                    debug!(%error, "branch form rejected");
                    form.error = Some(error);
                    return None;
                }
            };
            let credentials = state.credentials.clone()?;
            return begin(
                state,
                Mode::Submitting,
                Effect::SubmitBranchForm {
                    credentials,
                    ticket_key: submission.ticket.key,
                    branch_name: submission.branch_name,
                    mark_in_progress: submission.mark_in_progress,
                },
            );
        }
        _ if form.is_toggle_active() => match key.code {
            KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => form.toggle_mark_in_progress(),
            KeyCode::Char('y') => form.set_mark_in_progress(true),
            KeyCode::Char('n') => form.set_mark_in_progress(false),
            _ => {}
        },
        KeyCode::Backspace => {
            if let Some(field) = form.get_active_field_mut() {
                field.pop_char();
            }
            form.error = None;
        }
        _ => {
            if let Some(c) = typed_char(&key) {
                if let Some(field) = form.get_active_field_mut() {
                    field.push_char(c);
                }
                form.error = None;
            }
        }
    }
    None
}

/// Whether esc can leave the error view for an existing ticket list
pub fn can_return_to_list(state: &AppState) -> bool {
    state.credentials.is_some() && !state.all_tickets.is_empty()
}

fn handle_error_key(state: &mut AppState, key: KeyEvent) -> Option<Effect> {
    match key.code {
        KeyCode::Char('q') => state.quit = true,
        KeyCode::Char('r') => {
            let effect = state.retry.clone()?;
            info!(kind = ?effect.kind(), "retrying");
            return begin(state, mode_for(effect.kind()), effect);
        }
        KeyCode::Esc if can_return_to_list(state) => {
            state.last_error = None;
            state.retry = None;
            state.mode = Mode::TicketList;
        }
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::CheckoutOutcome;
    use crate::state::{Credentials, Ticket};
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(mut state: AppState, text: &str) -> AppState {
        for c in text.chars() {
            state = reduce(state, key(KeyCode::Char(c))).0;
        }
        state
    }

    fn creds() -> Credentials {
        Credentials {
            base_url: "https://acme.atlassian.net".to_string(),
            email: "dev@acme.io".to_string(),
            api_token: "tok".to_string(),
        }
    }

    fn ticket(key: &str, issue_type: &str, summary: &str, status: &str) -> Ticket {
        Ticket {
            key: key.to_string(),
            issue_type: issue_type.to_string(),
            summary: summary.to_string(),
            status: status.to_string(),
            created_at: "2024-01-15T10:30:00.000+0000".to_string(),
        }
    }

    fn sample_tickets() -> Vec<Ticket> {
        vec![
            ticket("AB-12", "Story", "x", "To Do"),
            ticket("AB-13", "Bug", "Fix login bug", "In Progress"),
            ticket("AB-14", "Task", "Write docs", "To Do"),
        ]
    }

    fn completed(kind: EffectKind, outcome: EffectOutcome) -> Event {
        Event::completed(kind, outcome)
    }

    /// Run startup through a successful fetch of `tickets`
    fn listing(tickets: Vec<Ticket>) -> AppState {
        let (state, _) = init(CredentialPrefill::default());
        let (state, _) = reduce(
            state,
            completed(
                EffectKind::LoadCredentials,
                EffectOutcome::CredentialsReady(creds()),
            ),
        );
        let (state, _) = reduce(
            state,
            completed(EffectKind::FetchTickets, EffectOutcome::TicketsLoaded(tickets)),
        );
        assert_eq!(state.mode, Mode::TicketList);
        state
    }

    fn commit_search(state: AppState, term: &str) -> AppState {
        let (state, _) = reduce(state, key(KeyCode::Char('/')));
        let mut state = state;
        state.pending_search_input.clear();
        let state = type_text(state, term);
        reduce(state, key(KeyCode::Enter)).0
    }

    mod startup {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_init_checks_stored_credentials() {
            let (state, effect) = init(CredentialPrefill::default());
            assert_eq!(state.mode, Mode::AwaitingCredentials);
            assert_eq!(effect, Some(Effect::LoadAndValidateCredentials));
            assert_eq!(state.in_flight, Some(EffectKind::LoadCredentials));
            assert!(state.credentials_form.is_none());
        }

        #[test]
        fn test_stored_credentials_start_fetch() {
            let (state, _) = init(CredentialPrefill::default());
            let (state, effect) = reduce(
                state,
                completed(
                    EffectKind::LoadCredentials,
                    EffectOutcome::CredentialsReady(creds()),
                ),
            );
            assert_eq!(state.mode, Mode::Loading);
            assert_eq!(state.credentials, Some(creds()));
            assert_eq!(effect, Some(Effect::FetchTickets(creds())));
        }

        #[test]
        fn test_missing_credentials_show_form_and_reject_blank_url() {
            let prefill = CredentialPrefill {
                email: Some("a@b.com".to_string()),
                ..Default::default()
            };
            let (state, _) = init(prefill);
            let (state, effect) = reduce(
                state,
                completed(EffectKind::LoadCredentials, EffectOutcome::CredentialsNeeded),
            );
            assert_eq!(state.mode, Mode::AwaitingCredentials);
            assert!(effect.is_none());
            assert!(state.credentials_form.is_some());

            // url left blank, email prefilled, token typed
            let (state, _) = reduce(state, key(KeyCode::Tab));
            let (state, _) = reduce(state, key(KeyCode::Tab));
            let state = type_text(state, "x");
            let (state, effect) = reduce(state, key(KeyCode::Enter));

            assert_eq!(state.mode, Mode::AwaitingCredentials);
            assert!(effect.is_none());
            let form = state.credentials_form.as_ref().unwrap();
            assert_eq!(
                form.error,
                Some(AppError::validation("all fields are required"))
            );
        }

        #[test]
        fn test_complete_form_validates_credentials() {
            let (state, _) = init(CredentialPrefill::default());
            let (state, _) = reduce(
                state,
                completed(EffectKind::LoadCredentials, EffectOutcome::CredentialsNeeded),
            );
            let state = type_text(state, "acme.atlassian.net");
            let (state, _) = reduce(state, key(KeyCode::Enter));
            let state = type_text(state, "dev@acme.io");
            let (state, _) = reduce(state, key(KeyCode::Enter));
            let state = type_text(state, "tok");
            let (state, effect) = reduce(state, key(KeyCode::Enter));

            assert_eq!(state.mode, Mode::Loading);
            assert_eq!(effect, Some(Effect::ValidateAndStoreCredentials(creds())));
        }

        #[test]
        fn test_rejected_credentials_return_to_form() {
            let mut state = AppState::new(CredentialPrefill::default());
            state.credentials_form = Some(CredentialsForm::new(&state.prefill));
            state.mode = Mode::Loading;
            state.in_flight = Some(EffectKind::ValidateCredentials);

            let error = AppError::Credential("bad token".to_string());
            let (state, effect) = reduce(
                state,
                completed(
                    EffectKind::ValidateCredentials,
                    EffectOutcome::Failed(error.clone()),
                ),
            );
            assert_eq!(state.mode, Mode::AwaitingCredentials);
            assert!(effect.is_none());
            assert_eq!(state.credentials_form.unwrap().error, Some(error));
        }

        #[test]
        fn test_network_failure_during_validation_is_retryable() {
            let (state, _) = init(CredentialPrefill::default());
            let (state, _) = reduce(
                state,
                completed(EffectKind::LoadCredentials, EffectOutcome::CredentialsNeeded),
            );
            let mut state = state;
            state.credentials_form = Some(CredentialsForm::new(&CredentialPrefill {
                base_url: Some("acme.atlassian.net".into()),
                email: Some("dev@acme.io".into()),
                api_token: Some("tok".into()),
            }));
            state.credentials_form.as_mut().unwrap().set_active_field(2);
            let (state, _) = reduce(state, key(KeyCode::Enter));

            let (state, _) = reduce(
                state,
                completed(
                    EffectKind::ValidateCredentials,
                    EffectOutcome::Failed(AppError::Network("timed out".into())),
                ),
            );
            assert_eq!(state.mode, Mode::Error);

            let (state, effect) = reduce(state, key(KeyCode::Char('r')));
            assert_eq!(state.mode, Mode::Loading);
            assert_eq!(effect, Some(Effect::ValidateAndStoreCredentials(creds())));
            assert!(state.last_error.is_none());
        }

        #[test]
        fn test_startup_check_failure_shows_reason_on_form() {
            let (state, _) = init(CredentialPrefill::default());
            let error = AppError::Network("connection refused".into());
            let (state, effect) = reduce(
                state,
                completed(EffectKind::LoadCredentials, EffectOutcome::Failed(error.clone())),
            );
            assert_eq!(state.mode, Mode::AwaitingCredentials);
            assert!(effect.is_none());
            assert_eq!(state.credentials_form.unwrap().error, Some(error));
        }

        #[test]
        fn test_keys_ignored_while_checking() {
            let (state, _) = init(CredentialPrefill::default());
            let (next, effect) = reduce(state.clone(), key(KeyCode::Char('q')));
            assert_eq!(next, state);
            assert!(effect.is_none());
        }
    }

    mod ticket_list {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_fetch_populates_list() {
            let state = listing(sample_tickets());
            assert_eq!(state.visible_tickets, sample_tickets());
            assert_eq!(state.in_flight, None);
        }

        #[test]
        fn test_enter_on_empty_list_is_noop() {
            let state = listing(vec![]);
            let (next, effect) = reduce(state.clone(), key(KeyCode::Enter));
            assert_eq!(next, state);
            assert!(effect.is_none());
        }

        #[test]
        fn test_navigation_keys() {
            let state = listing(sample_tickets());
            let (state, _) = reduce(state, key(KeyCode::Char('j')));
            assert_eq!(state.selected_index, 1);
            let (state, _) = reduce(state, key(KeyCode::Char('G')));
            assert_eq!(state.selected_index, 2);
            let (state, _) = reduce(state, key(KeyCode::Down));
            assert_eq!(state.selected_index, 2);
            let (state, _) = reduce(state, key(KeyCode::Char('k')));
            assert_eq!(state.selected_index, 1);
            let (state, _) = reduce(state, key(KeyCode::Char('g')));
            assert_eq!(state.selected_index, 0);
        }

        #[test]
        fn test_enter_opens_branch_form() {
            let state = listing(sample_tickets());
            let (state, _) = reduce(state, key(KeyCode::Down));
            let (state, effect) = reduce(state, key(KeyCode::Enter));
            assert_eq!(state.mode, Mode::BranchForm);
            assert!(effect.is_none());
            let form = state.branch_form.unwrap();
            assert_eq!(form.ticket.key, "AB-13");
            assert_eq!(form.branch_name.as_text(), "bugfix/ab-13-fix_login_bug");
        }

        #[test]
        fn test_refresh_keeps_search_term() {
            let state = commit_search(listing(sample_tickets()), "docs");
            assert_eq!(state.visible_tickets.len(), 1);

            let (state, effect) = reduce(state, key(KeyCode::Char('r')));
            assert_eq!(state.mode, Mode::Loading);
            assert_eq!(effect, Some(Effect::FetchTickets(creds())));

            let (state, _) = reduce(
                state,
                completed(
                    EffectKind::FetchTickets,
                    EffectOutcome::TicketsLoaded(sample_tickets()),
                ),
            );
            assert_eq!(state.search_term, "docs");
            assert_eq!(state.visible_tickets.len(), 1);
            assert_eq!(state.visible_tickets[0].key, "AB-14");
        }

        #[test]
        fn test_sign_out_clears_session() {
            let state = listing(sample_tickets());
            let (state, effect) = reduce(state, key(KeyCode::Char('S')));
            assert_eq!(state.mode, Mode::AwaitingCredentials);
            assert_eq!(effect, Some(Effect::ClearCredentials));
            assert!(state.credentials.is_none());
            assert!(state.all_tickets.is_empty());
            assert!(state.credentials_form.is_some());

            let (state, _) = reduce(
                state,
                completed(EffectKind::ClearCredentials, EffectOutcome::CredentialsCleared),
            );
            assert_eq!(state.in_flight, None);
            assert_eq!(state.mode, Mode::AwaitingCredentials);
        }

        #[test]
        fn test_q_quits() {
            let (state, _) = reduce(listing(vec![]), key(KeyCode::Char('q')));
            assert!(state.quit);
        }
    }

    mod search {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_commit_filters_by_status() {
            let tickets = vec![
                ticket("AB-1", "Task", "One", "To Do"),
                ticket("AB-2", "Task", "Two", "In Progress"),
            ];
            let state = commit_search(listing(tickets), "progress");
            assert_eq!(state.mode, Mode::TicketList);
            assert_eq!(state.search_term, "progress");
            assert_eq!(state.visible_tickets.len(), 1);
            assert_eq!(state.visible_tickets[0].key, "AB-2");
        }

        #[test]
        fn test_typing_does_not_filter_until_commit() {
            let state = listing(sample_tickets());
            let (state, _) = reduce(state, key(KeyCode::Char('/')));
            let state = type_text(state, "docs");
            assert_eq!(state.mode, Mode::SearchEditing);
            assert_eq!(state.pending_search_input, "docs");
            assert_eq!(state.visible_tickets.len(), 3);
        }

        #[test]
        fn test_esc_restores_previous_term() {
            let state = commit_search(listing(sample_tickets()), "bug");
            let (state, _) = reduce(state, key(KeyCode::Char('/')));
            let state = type_text(state, "zzz");
            let (state, _) = reduce(state, key(KeyCode::Esc));
            assert_eq!(state.mode, Mode::TicketList);
            assert_eq!(state.search_term, "bug");
            assert_eq!(state.visible_tickets.len(), 1);
        }

        #[test]
        fn test_backspace_edits_pending_input() {
            let state = listing(sample_tickets());
            let (state, _) = reduce(state, key(KeyCode::Char('/')));
            let state = type_text(state, "ab");
            let (state, _) = reduce(state, key(KeyCode::Backspace));
            assert_eq!(state.pending_search_input, "a");
        }

        #[test]
        fn test_visible_is_subset_of_all() {
            let mut state = listing(sample_tickets());
            for term in ["ab", "to do", "", "FIX", "nothing-matches", "1"] {
                state = commit_search(state, term);
                for visible in &state.visible_tickets {
                    assert!(state.all_tickets.iter().any(|t| t.key == visible.key));
                }
                assert!(
                    state.visible_tickets.is_empty()
                        || state.selected_index < state.visible_tickets.len()
                );
            }
        }
    }

    mod branch_form {
        use super::*;
        use pretty_assertions::assert_eq;

        fn open_form(index: usize) -> AppState {
            let mut state = listing(sample_tickets());
            state.selected_index = index;
            reduce(state, key(KeyCode::Enter)).0
        }

        #[test]
        fn test_submit_dispatches_checkout() {
            let state = open_form(0);
            let (state, effect) = reduce(state, key(KeyCode::Enter));
            assert_eq!(state.mode, Mode::BranchForm);
            assert!(effect.is_none());

            let (state, effect) = reduce(state, key(KeyCode::Enter));
            assert_eq!(state.mode, Mode::Submitting);
            assert_eq!(
                effect,
                Some(Effect::SubmitBranchForm {
                    credentials: creds(),
                    ticket_key: "AB-12".to_string(),
                    branch_name: "feature/ab-12-x".to_string(),
                    mark_in_progress: true,
                })
            );
        }

        #[test]
        fn test_toggle_mark_in_progress() {
            let state = open_form(0);
            let (state, _) = reduce(state, key(KeyCode::Tab));
            let (state, _) = reduce(state, key(KeyCode::Char('n')));
            let (_, effect) = reduce(state, key(KeyCode::Enter));
            assert!(matches!(
                effect,
                Some(Effect::SubmitBranchForm {
                    mark_in_progress: false,
                    ..
                })
            ));
        }

        #[test]
        fn test_in_progress_ticket_submits_from_name_field() {
            let state = open_form(1);
            let (state, effect) = reduce(state, key(KeyCode::Enter));
            assert_eq!(state.mode, Mode::Submitting);
            assert!(matches!(
                effect,
                Some(Effect::SubmitBranchForm {
                    mark_in_progress: false,
                    ..
                })
            ));
        }

        #[test]
        fn test_edited_name_is_validated() {
            let state = open_form(1);
            let state = type_text(state, " ");
            let (state, effect) = reduce(state, key(KeyCode::Enter));
            assert_eq!(state.mode, Mode::BranchForm);
            assert!(effect.is_none());
            assert_eq!(
                state.branch_form.unwrap().error.map(|e| e.kind()),
                Some(ErrorKind::Validation)
            );
        }

        #[test]
        fn test_esc_discards_form() {
            let state = open_form(0);
            let (state, _) = reduce(state, key(KeyCode::Esc));
            assert_eq!(state.mode, Mode::TicketList);
            assert!(state.branch_form.is_none());
        }

        fn submitted() -> (AppState, Option<Effect>) {
            let state = open_form(0);
            let (state, _) = reduce(state, key(KeyCode::Enter));
            reduce(state, key(KeyCode::Enter))
        }

        #[test]
        fn test_checkout_failure_retries_checkout_only() {
            let (state, first) = submitted();
            assert!(matches!(
                first,
                Some(Effect::SubmitBranchForm {
                    mark_in_progress: true,
                    ..
                })
            ));

            let (state, effect) = reduce(
                state,
                completed(
                    EffectKind::SubmitBranch,
                    EffectOutcome::CheckoutFailed {
                        error: AppError::Subprocess("exit status 1".into()),
                        ticket_marked: true,
                    },
                ),
            );
            assert_eq!(state.mode, Mode::Error);
            assert!(effect.is_none());
            assert!(state.branch_form.is_none());
            assert_eq!(
                state.last_error,
                Some(AppError::Subprocess("exit status 1".into()))
            );

            let (state, retried) = reduce(state, key(KeyCode::Char('r')));
            assert_eq!(state.mode, Mode::Submitting);
            assert_eq!(
                retried,
                Some(Effect::SubmitBranchForm {
                    credentials: creds(),
                    ticket_key: "AB-12".to_string(),
                    branch_name: "feature/ab-12-x".to_string(),
                    mark_in_progress: false,
                })
            );
        }

        #[test]
        fn test_transition_failure_retries_same_submission() {
            let (state, first) = submitted();
            let (state, _) = reduce(
                state,
                completed(
                    EffectKind::SubmitBranch,
                    EffectOutcome::Failed(AppError::Api {
                        status: 400,
                        message: "no 'In Progress' transition".into(),
                    }),
                ),
            );
            assert_eq!(state.mode, Mode::Error);

            let (_, retried) = reduce(state, key(KeyCode::Char('r')));
            assert_eq!(retried, first);
        }

        #[test]
        fn test_rejected_token_on_submit_returns_to_credentials() {
            let (state, _) = submitted();
            let (state, effect) = reduce(
                state,
                completed(
                    EffectKind::SubmitBranch,
                    EffectOutcome::Failed(AppError::Credential("token revoked".into())),
                ),
            );
            assert_eq!(state.mode, Mode::AwaitingCredentials);
            assert!(effect.is_none());
            assert!(state.branch_form.is_none());
            assert!(state.credentials.is_none());
            assert!(state.retry.is_none());
        }

        #[test]
        fn test_branch_ready_quits() {
            let state = open_form(0);
            let (state, _) = reduce(state, key(KeyCode::Enter));
            let (state, _) = reduce(state, key(KeyCode::Enter));
            let (state, _) = reduce(
                state,
                completed(
                    EffectKind::SubmitBranch,
                    EffectOutcome::BranchReady {
                        branch_name: "feature/ab-12-x".into(),
                        outcome: CheckoutOutcome::Created,
                    },
                ),
            );
            assert!(state.quit);
            assert_eq!(state.checked_out_branch.as_deref(), Some("feature/ab-12-x"));
        }
    }

    mod errors {
        use super::*;
        use pretty_assertions::assert_eq;

        fn failed_refresh() -> AppState {
            let state = listing(sample_tickets());
            let (state, _) = reduce(state, key(KeyCode::Char('r')));
            reduce(
                state,
                completed(
                    EffectKind::FetchTickets,
                    EffectOutcome::Failed(AppError::Api {
                        status: 500,
                        message: "boom".into(),
                    }),
                ),
            )
            .0
        }

        #[test]
        fn test_fetch_failure_enters_error() {
            let state = failed_refresh();
            assert_eq!(state.mode, Mode::Error);
            assert!(state.last_error.is_some());
        }

        #[test]
        fn test_esc_returns_to_existing_list() {
            let (state, _) = reduce(failed_refresh(), key(KeyCode::Esc));
            assert_eq!(state.mode, Mode::TicketList);
            assert!(state.last_error.is_none());
            assert_eq!(state.all_tickets.len(), 3);
        }

        #[test]
        fn test_esc_without_list_stays() {
            let (state, _) = init(CredentialPrefill::default());
            let (state, _) = reduce(
                state,
                completed(
                    EffectKind::LoadCredentials,
                    EffectOutcome::CredentialsReady(creds()),
                ),
            );
            let (state, _) = reduce(
                state,
                completed(
                    EffectKind::FetchTickets,
                    EffectOutcome::Failed(AppError::Network("offline".into())),
                ),
            );
            let (state, _) = reduce(state, key(KeyCode::Esc));
            assert_eq!(state.mode, Mode::Error);
        }

        #[test]
        fn test_rejected_token_on_fetch_returns_to_credentials() {
            let (state, _) = init(CredentialPrefill::default());
            let (state, _) = reduce(
                state,
                completed(
                    EffectKind::LoadCredentials,
                    EffectOutcome::CredentialsReady(creds()),
                ),
            );
            let error = AppError::Credential("token revoked".into());
            let (state, effect) = reduce(
                state,
                completed(EffectKind::FetchTickets, EffectOutcome::Failed(error.clone())),
            );
            assert_eq!(state.mode, Mode::AwaitingCredentials);
            assert!(effect.is_none());
            assert!(state.credentials.is_none());

            let form = state.credentials_form.as_ref().unwrap();
            assert_eq!(form.error, Some(error));
            assert_eq!(form.base_url.as_text(), "https://acme.atlassian.net");
            assert_eq!(form.email.as_text(), "dev@acme.io");
            assert_eq!(form.api_token.as_text(), "");

            // A fresh token can be submitted straight away
            let mut state = state;
            state.credentials_form.as_mut().unwrap().set_active_field(2);
            let state = type_text(state, "tok");
            let (state, effect) = reduce(state, key(KeyCode::Enter));
            assert_eq!(state.mode, Mode::Loading);
            assert_eq!(effect, Some(Effect::ValidateAndStoreCredentials(creds())));
        }

        #[test]
        fn test_q_quits_from_error() {
            let (state, _) = reduce(failed_refresh(), key(KeyCode::Char('q')));
            assert!(state.quit);
        }
    }

    mod global {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_ctrl_c_quits_in_every_mode() {
            let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
            for mode in [
                Mode::AwaitingCredentials,
                Mode::Loading,
                Mode::Error,
                Mode::TicketList,
                Mode::SearchEditing,
                Mode::BranchForm,
                Mode::Submitting,
            ] {
                let state = AppState {
                    mode,
                    ..Default::default()
                };
                let (state, effect) = reduce(state, ctrl_c.clone());
                assert!(state.quit, "{mode:?}");
                assert!(effect.is_none());
            }
        }

        #[test]
        fn test_q_is_text_in_search() {
            let state = listing(vec![]);
            let (state, _) = reduce(state, key(KeyCode::Char('/')));
            let (state, _) = reduce(state, key(KeyCode::Char('q')));
            assert!(!state.quit);
            assert_eq!(state.pending_search_input, "q");
        }

        #[test]
        fn test_resize_updates_viewport_only() {
            let state = listing(sample_tickets());
            let (next, _) = reduce(
                state.clone(),
                Event::Resize {
                    width: 120,
                    height: 40,
                },
            );
            assert_eq!(
                next.viewport,
                Viewport {
                    width: 120,
                    height: 40
                }
            );
            assert_eq!(next.mode, state.mode);
        }

        #[test]
        fn test_tick_advances_counter() {
            let (state, _) = reduce(AppState::default(), Event::Tick);
            assert_eq!(state.tick, 1);
        }

        #[test]
        fn test_stale_fetch_after_leaving_loading_is_dropped() {
            let state = failed_refresh_then_back();
            let before = state.clone();
            let (state, effect) = reduce(
                state,
                completed(
                    EffectKind::FetchTickets,
                    EffectOutcome::TicketsLoaded(vec![]),
                ),
            );
            assert_eq!(state, before);
            assert!(effect.is_none());
        }

        #[test]
        fn test_completion_of_wrong_kind_is_dropped() {
            let state = listing(sample_tickets());
            let (state, _) = reduce(state, key(KeyCode::Char('r')));
            let before = state.clone();
            let (state, _) = reduce(
                state,
                completed(
                    EffectKind::ValidateCredentials,
                    EffectOutcome::CredentialsReady(creds()),
                ),
            );
            assert_eq!(state, before);
        }

        fn failed_refresh_then_back() -> AppState {
            let state = listing(sample_tickets());
            let (state, _) = reduce(state, key(KeyCode::Char('r')));
            let (state, _) = reduce(
                state,
                completed(
                    EffectKind::FetchTickets,
                    EffectOutcome::Failed(AppError::Network("offline".into())),
                ),
            );
            reduce(state, key(KeyCode::Esc)).0
        }
    }
}

//! Background effects.
//!
//! The reducer only *requests* work by returning an [`Effect`]. The
//! [`Dispatcher`] runs each one as a detached tokio task and feeds exactly one
//! completion event back into the event loop's channel.

use crate::event::{EffectOutcome, Event};
use crate::git::BranchCheckout;
use crate::secrets::SecretStore;
use crate::state::Credentials;
use crate::tracker::TrackerApi;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// Tag carried by completion events so stale results can be recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    LoadCredentials,
    ValidateCredentials,
    ClearCredentials,
    FetchTickets,
    SubmitBranch,
}

/// A named, parameterized one-shot unit of background work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Read the secret store and check whatever is there against Jira
    LoadAndValidateCredentials,
    /// Check user-entered credentials, persisting them on success
    ValidateAndStoreCredentials(Credentials),
    /// Delete the stored credentials (sign out)
    ClearCredentials,
    FetchTickets(Credentials),
    /// Optionally transition the ticket, then check out the branch
    SubmitBranchForm {
        credentials: Credentials,
        ticket_key: String,
        branch_name: String,
        mark_in_progress: bool,
    },
}

impl Effect {
    pub fn kind(&self) -> EffectKind {
        match self {
            Self::LoadAndValidateCredentials => EffectKind::LoadCredentials,
            Self::ValidateAndStoreCredentials(_) => EffectKind::ValidateCredentials,
            Self::ClearCredentials => EffectKind::ClearCredentials,
            Self::FetchTickets(_) => EffectKind::FetchTickets,
            Self::SubmitBranchForm { .. } => EffectKind::SubmitBranch,
        }
    }
}

/// External collaborators the effects talk to
#[derive(Clone)]
pub struct Services {
    pub tracker: Arc<dyn TrackerApi>,
    pub secrets: Arc<dyn SecretStore>,
    pub git: Arc<dyn BranchCheckout>,
}

async fn load_and_validate(services: &Services) -> EffectOutcome {
    let credentials = match services.secrets.load().await {
        Ok(Some(credentials)) => credentials,
        Ok(None) => {
            info!("no stored credentials");
            return EffectOutcome::CredentialsNeeded;
        }
        Err(e) => return EffectOutcome::Failed(e),
    };

    // Any failure here is shown on the credential form
    match services.tracker.check_credentials(&credentials).await {
        Ok(()) => EffectOutcome::CredentialsReady(credentials),
        Err(e) => EffectOutcome::Failed(e),
    }
}

async fn validate_and_store(services: &Services, credentials: Credentials) -> EffectOutcome {
    if let Err(e) = services.tracker.check_credentials(&credentials).await {
        return EffectOutcome::Failed(e);
    }
    if let Err(e) = services.secrets.store(&credentials).await {
        return EffectOutcome::Failed(e);
    }
    EffectOutcome::CredentialsReady(credentials)
}

async fn submit_branch(
    services: &Services,
    credentials: &Credentials,
    ticket_key: &str,
    branch_name: String,
    mark_in_progress: bool,
) -> EffectOutcome {
    if mark_in_progress {
        if let Err(e) = services
            .tracker
            .mark_in_progress(credentials, ticket_key)
            .await
        {
            return EffectOutcome::Failed(e);
        }
    }
    match services.git.checkout(&branch_name).await {
        Ok(outcome) => EffectOutcome::BranchReady {
            branch_name,
            outcome,
        },
        Err(error) => EffectOutcome::CheckoutFailed {
            error,
            ticket_marked: mark_in_progress,
        },
    }
}

/// Run one effect to completion and wrap its result as an event
pub async fn run_effect(services: &Services, effect: Effect) -> Event {
    let kind = effect.kind();
    let outcome = match effect {
        Effect::LoadAndValidateCredentials => load_and_validate(services).await,
        Effect::ValidateAndStoreCredentials(credentials) => {
            validate_and_store(services, credentials).await
        }
        Effect::ClearCredentials => match services.secrets.clear().await {
            Ok(()) => EffectOutcome::CredentialsCleared,
            Err(e) => EffectOutcome::Failed(e),
        },
        Effect::FetchTickets(credentials) => {
            match services.tracker.fetch_tickets(&credentials).await {
                Ok(tickets) => EffectOutcome::TicketsLoaded(tickets),
                Err(e) => EffectOutcome::Failed(e),
            }
        }
        Effect::SubmitBranchForm {
            credentials,
            ticket_key,
            branch_name,
            mark_in_progress,
        } => {
            submit_branch(
                services,
                &credentials,
                &ticket_key,
                branch_name,
                mark_in_progress,
            )
            .await
        }
    };
    match &outcome {
        EffectOutcome::Failed(e) | EffectOutcome::CheckoutFailed { error: e, .. } => {
            warn!(?kind, error = %e, "effect failed");
        }
        _ => debug!(?kind, "effect completed"),
    }
    Event::completed(kind, outcome)
}

/// Spawns effects off the event loop and routes their results back into it
pub struct Dispatcher {
    services: Services,
    events: UnboundedSender<Event>,
}

impl Dispatcher {
    pub fn new(services: Services, events: UnboundedSender<Event>) -> Self {
        Self { services, events }
    }

    pub fn dispatch(&self, effect: Effect) {
        info!(kind = ?effect.kind(), "dispatching effect");
        let services = self.services.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = run_effect(&services, effect).await;
            // The loop may already be gone after quit
            let _ = events.send(event);
        });
    }
}

//! Events consumed by the reducer

use crate::effects::EffectKind;
use crate::error::AppError;
use crate::git::CheckoutOutcome;
use crate::state::{Credentials, Ticket};
use crossterm::event::KeyEvent;

/// Terminal result of a background effect
#[derive(Debug, Clone, PartialEq)]
pub enum EffectOutcome {
    CredentialsReady(Credentials),
    CredentialsNeeded,
    CredentialsCleared,
    TicketsLoaded(Vec<Ticket>),
    BranchReady {
        branch_name: String,
        outcome: CheckoutOutcome,
    },
    /// The git step failed. `ticket_marked` says whether the ticket was
    /// already transitioned before it.
    CheckoutFailed {
        error: AppError,
        ticket_marked: bool,
    },
    Failed(AppError),
}

/// Everything that can advance the application state
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    /// Animation timer
    Tick,
    /// Completion of an effect, tagged with the kind that produced it
    Completed {
        kind: EffectKind,
        outcome: EffectOutcome,
    },
}

impl Event {
    pub fn completed(kind: EffectKind, outcome: EffectOutcome) -> Self {
        Self::Completed { kind, outcome }
    }
}

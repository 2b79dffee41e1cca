//! Trait abstraction for the tracker client to enable mocking in tests

use crate::error::AppError;
use crate::state::{Credentials, Ticket};
use async_trait::async_trait;

/// Issue-tracker operations the effects need
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackerApi: Send + Sync {
    /// Hit the auth-check endpoint; `Ok` means the credentials are valid
    async fn check_credentials(&self, credentials: &Credentials) -> Result<(), AppError>;

    /// Unfinished tickets assigned to the current user, oldest first
    async fn fetch_tickets(&self, credentials: &Credentials) -> Result<Vec<Ticket>, AppError>;

    /// Move a ticket to "In Progress" via its workflow transition
    async fn mark_in_progress(
        &self,
        credentials: &Credentials,
        ticket_key: &str,
    ) -> Result<(), AppError>;
}

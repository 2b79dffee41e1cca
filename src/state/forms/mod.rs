//! Form domain layer
//!
//! Scoped editing buffers for the credential-entry and branch forms.

mod field;
mod form_state;

pub use field::FormField;
pub use form_state::{BranchForm, CredentialsForm, Form};

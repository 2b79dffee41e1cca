//! Branch name derivation and validation

use crate::error::AppError;
use crate::state::Ticket;

const BUG_PREFIX: &str = "bugfix/";
const FEATURE_PREFIX: &str = "feature/";

/// Characters git accepts in the names this tool creates
pub fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/')
}

/// Default branch name for a ticket, e.g. `bugfix/ab-12-fix_login_bug`.
///
/// Whitespace runs become `_` first, then anything outside
/// `[A-Za-z0-9-_./]` is dropped.
pub fn derive_branch_name(ticket: &Ticket) -> String {
    let prefix = if ticket.is_bug() {
        BUG_PREFIX
    } else {
        FEATURE_PREFIX
    };
    let body = format!("{}-{}", ticket.key, ticket.summary).to_lowercase();

    let mut name = String::with_capacity(prefix.len() + body.len());
    name.push_str(prefix);

    let mut in_whitespace = false;
    for c in body.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                name.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if is_allowed_char(c) {
            name.push(c);
        }
    }
    name
}

/// Check a user-edited branch name before checkout is attempted
pub fn validate_branch_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        return Err(AppError::validation("branch name is required"));
    }
    if !name.chars().all(is_allowed_char) {
        return Err(AppError::validation(
            "branch name can only contain letters, numbers, '-', '_', '/' and '.'",
        ));
    }
    Ok(())
}

//! Credential and branch forms.
//!
//! Form input lives in these scoped buffers and is only turned into
//! credentials or an effect when the user submits.

use super::field::FormField;
use crate::branch::{derive_branch_name, validate_branch_name};
use crate::error::AppError;
use crate::state::{CredentialPrefill, Credentials, Ticket};

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
    fn is_last_field(&self) -> bool {
        self.active_field() + 1 == self.field_count()
    }
    /// Text field under the cursor, `None` for non-text fields
    fn get_active_field_mut(&mut self) -> Option<&mut FormField>;
}

// Credentials Form
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialsForm {
    pub base_url: FormField,
    pub email: FormField,
    pub api_token: FormField,
    pub active_field_index: usize,
    pub error: Option<AppError>,
}

impl CredentialsForm {
    pub fn new(prefill: &CredentialPrefill) -> Self {
        let value = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            base_url: FormField::text("Atlassian URL", "your-company.atlassian.net")
                .with_value(value(&prefill.base_url)),
            email: FormField::text("Email", "your-email@company.com")
                .with_value(value(&prefill.email)),
            api_token: FormField::secret("API Token", "Your Jira API token")
                .with_value(value(&prefill.api_token)),
            active_field_index: 0,
            error: None,
        }
    }

    pub fn fields(&self) -> [&FormField; 3] {
        [&self.base_url, &self.email, &self.api_token]
    }

    /// Read the current values and reject the submission if any is blank
    pub fn validate(&self) -> Result<Credentials, AppError> {
        let credentials = Credentials::from_input(
            self.base_url.as_text(),
            self.email.as_text(),
            self.api_token.as_text(),
        );
        if credentials.base_url.is_empty()
            || credentials.email.is_empty()
            || credentials.api_token.is_empty()
        {
            return Err(AppError::validation("all fields are required"));
        }
        Ok(credentials)
    }
}

impl Form for CredentialsForm {
    fn field_count(&self) -> usize {
        3 // url, email, token
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(2);
    }
    fn get_active_field_mut(&mut self) -> Option<&mut FormField> {
        match self.active_field_index {
            0 => Some(&mut self.base_url),
            1 => Some(&mut self.email),
            _ => Some(&mut self.api_token),
        }
    }
}

/// What the branch form produces once it validates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchSubmission {
    pub ticket: Ticket,
    pub branch_name: String,
    pub mark_in_progress: bool,
}

// Branch Form
#[derive(Debug, Clone, PartialEq)]
pub struct BranchForm {
    pub ticket: Ticket,
    pub branch_name: FormField,
    /// `None` when the ticket is already in progress and the toggle is not offered
    pub mark_in_progress: Option<bool>,
    pub active_field_index: usize,
    pub error: Option<AppError>,
}

impl BranchForm {
    pub fn for_ticket(ticket: &Ticket) -> Self {
        Self {
            ticket: ticket.clone(),
            branch_name: FormField::text("Branch name", "")
                .with_value(derive_branch_name(ticket)),
            mark_in_progress: (!ticket.is_in_progress()).then_some(true),
            active_field_index: 0,
            error: None,
        }
    }

    pub fn is_toggle_active(&self) -> bool {
        self.mark_in_progress.is_some() && self.active_field_index == 1
    }

    pub fn toggle_mark_in_progress(&mut self) {
        if let Some(mark) = self.mark_in_progress.as_mut() {
            *mark = !*mark;
        }
    }

    pub fn set_mark_in_progress(&mut self, value: bool) {
        if let Some(mark) = self.mark_in_progress.as_mut() {
            *mark = value;
        }
    }

    /// Validate the edited branch name and produce the submission
    pub fn validate(&self) -> Result<BranchSubmission, AppError> {
        let branch_name = self.branch_name.as_text().to_string();
        validate_branch_name(&branch_name)?;
        Ok(BranchSubmission {
            ticket: self.ticket.clone(),
            branch_name,
            mark_in_progress: self.mark_in_progress.unwrap_or(false),
        })
    }
}

impl Form for BranchForm {
    fn field_count(&self) -> usize {
        if self.mark_in_progress.is_some() {
            2 // branch name, mark in progress
        } else {
            1
        }
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.field_count() - 1);
    }
    fn get_active_field_mut(&mut self) -> Option<&mut FormField> {
        match self.active_field_index {
            0 => Some(&mut self.branch_name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn ticket(status: &str) -> Ticket {
        Ticket {
            key: "AB-12".to_string(),
            issue_type: "Bug".to_string(),
            summary: "Fix login bug".to_string(),
            status: status.to_string(),
            created_at: String::new(),
        }
    }

    mod credentials_form {
        use super::*;

        #[test]
        fn test_new_uses_prefill() {
            let prefill = CredentialPrefill {
                base_url: Some("acme.atlassian.net".into()),
                email: None,
                api_token: Some("tok".into()),
            };
            let form = CredentialsForm::new(&prefill);
            assert_eq!(form.base_url.as_text(), "acme.atlassian.net");
            assert_eq!(form.email.as_text(), "");
            assert_eq!(form.api_token.as_text(), "tok");
            assert!(form.api_token.is_secret);
        }

        #[test]
        fn test_validate_rejects_blank_field() {
            let prefill = CredentialPrefill {
                base_url: Some("".into()),
                email: Some("a@b.com".into()),
                api_token: Some("x".into()),
            };
            let err = CredentialsForm::new(&prefill).validate().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
            assert_eq!(err.to_string(), "all fields are required");
        }

        #[test]
        fn test_validate_rejects_whitespace_only() {
            let prefill = CredentialPrefill {
                base_url: Some("acme".into()),
                email: Some("   ".into()),
                api_token: Some("x".into()),
            };
            assert!(CredentialsForm::new(&prefill).validate().is_err());
        }

        #[test]
        fn test_validate_returns_normalized_credentials() {
            let prefill = CredentialPrefill {
                base_url: Some("acme.atlassian.net".into()),
                email: Some("a@b.com".into()),
                api_token: Some("x".into()),
            };
            let creds = CredentialsForm::new(&prefill).validate().unwrap();
            assert_eq!(creds.base_url, "https://acme.atlassian.net");
        }

        #[test]
        fn test_field_navigation_wraps() {
            let mut form = CredentialsForm::new(&CredentialPrefill::default());
            form.prev_field();
            assert_eq!(form.active_field(), 2);
            assert!(form.is_last_field());
            form.next_field();
            assert_eq!(form.active_field(), 0);
        }
    }

    mod branch_form {
        use super::*;

        #[test]
        fn test_for_ticket_derives_branch_name() {
            let form = BranchForm::for_ticket(&ticket("To Do"));
            assert_eq!(form.branch_name.as_text(), "bugfix/ab-12-fix_login_bug");
            assert_eq!(form.mark_in_progress, Some(true));
            assert_eq!(form.field_count(), 2);
        }

        #[test]
        fn test_in_progress_ticket_skips_toggle() {
            let form = BranchForm::for_ticket(&ticket("In Progress"));
            assert_eq!(form.mark_in_progress, None);
            assert_eq!(form.field_count(), 1);
            assert!(form.is_last_field());
        }

        #[test]
        fn test_toggle_only_when_offered() {
            let mut form = BranchForm::for_ticket(&ticket("In Progress"));
            form.toggle_mark_in_progress();
            assert_eq!(form.mark_in_progress, None);

            let mut form = BranchForm::for_ticket(&ticket("To Do"));
            form.toggle_mark_in_progress();
            assert_eq!(form.mark_in_progress, Some(false));
        }

        #[test]
        fn test_validate_rejects_empty_name() {
            let mut form = BranchForm::for_ticket(&ticket("To Do"));
            form.branch_name.value.clear();
            let err = form.validate().unwrap_err();
            assert_eq!(err.to_string(), "branch name is required");
        }

        #[test]
        fn test_validate_produces_submission() {
            let form = BranchForm::for_ticket(&ticket("In Progress"));
            let submission = form.validate().unwrap();
            assert_eq!(submission.branch_name, "bugfix/ab-12-fix_login_bug");
            assert!(!submission.mark_in_progress);
        }

        #[test]
        fn test_toggle_field_has_no_text_input() {
            let mut form = BranchForm::for_ticket(&ticket("To Do"));
            form.next_field();
            assert!(form.is_toggle_active());
            assert!(form.get_active_field_mut().is_none());
        }
    }
}

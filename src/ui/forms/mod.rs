//! Form rendering module
//!
//! - `field_renderer`: boxed text fields, toggles and inline errors
//! - `credentials_form`: Jira URL / email / API token entry
//! - `branch_form`: branch name and mark-in-progress, with a ticket sidebar

mod branch_form;
mod credentials_form;
mod field_renderer;

pub use branch_form::draw as draw_branch_form;
pub use credentials_form::draw as draw_credentials_form;

//! Jira REST client used by the background effects

mod client;
mod traits;

pub use client::JiraClient;
pub use traits::TrackerApi;

#[cfg(test)]
pub use traits::MockTrackerApi;

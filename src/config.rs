//! Configuration handling for the TUI

use crate::state::CredentialPrefill;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const ENV_JIRA_URL: &str = "JIRA_URL";
pub const ENV_JIRA_EMAIL: &str = "JIRA_EMAIL";
pub const ENV_JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";
pub const ENV_LOG_FILTER: &str = "JIRA_BRANCH_LOG";

const DEFAULT_MAX_RESULTS: u32 = 100;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_IN_PROGRESS_TRANSITION: &str = "In Progress";

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Jira site used to pre-fill the credential form
    pub jira_url: Option<String>,
    /// Account email used to pre-fill the credential form
    pub email: Option<String>,
    /// tracing filter directive, e.g. "jira_branch=debug"
    pub log_level: Option<String>,
    /// Cap on the number of tickets fetched
    pub max_results: Option<u32>,
    /// Timeout for every Jira request
    pub request_timeout_secs: Option<u64>,
    /// Name of the transition used by "mark as in progress"
    pub in_progress_transition: Option<String>,
}

impl AppConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("dev", "jira-branch", "jira-branch")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Directory for the log file
    pub fn data_dir() -> PathBuf {
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(std::env::temp_dir)
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: AppConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Apply environment overrides on top of the file values
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(url) = non_empty(ENV_JIRA_URL) {
            self.jira_url = Some(url);
        }
        if let Some(email) = non_empty(ENV_JIRA_EMAIL) {
            self.email = Some(email);
        }
        if let Some(level) = non_empty(ENV_LOG_FILTER) {
            self.log_level = Some(level);
        }
        self
    }

    /// Credential form pre-fill. The API token only ever comes from the environment.
    pub fn prefill(&self) -> CredentialPrefill {
        self.prefill_with(|key| std::env::var(key).ok())
    }

    fn prefill_with(&self, lookup: impl Fn(&str) -> Option<String>) -> CredentialPrefill {
        CredentialPrefill {
            base_url: self.jira_url.clone(),
            email: self.email.clone(),
            api_token: lookup(ENV_JIRA_API_TOKEN).filter(|token| !token.trim().is_empty()),
        }
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_MAX_RESULTS)
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    pub fn in_progress_transition(&self) -> &str {
        self.in_progress_transition
            .as_deref()
            .unwrap_or(DEFAULT_IN_PROGRESS_TRANSITION)
    }

    pub fn log_filter(&self) -> &str {
        self.log_level.as_deref().unwrap_or("jira_branch=info")
    }
}

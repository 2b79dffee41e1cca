//! Error taxonomy shared by the reducer and the background effects

use thiserror::Error;

/// Coarse error category, used by the reducer to pick a recovery path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Credential,
    Network,
    Api,
    Validation,
    Subprocess,
    SecretStore,
    Decode,
}

/// Every failure the application can surface to the user
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Missing, invalid or expired credentials (HTTP 401)
    #[error("authentication failed: {0}")]
    Credential(String),

    /// Connectivity or timeout talking to the tracker
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx, non-401 response
    #[error("jira API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Local form input rejected before any effect runs
    #[error("{0}")]
    Validation(String),

    /// Branch checkout command failed
    #[error("{0}")]
    Subprocess(String),

    /// OS credential store read/write/delete failed
    #[error("credential store error: {0}")]
    SecretStore(String),

    /// Tracker response body could not be decoded
    #[error("unexpected response from jira: {0}")]
    Decode(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Credential(_) => ErrorKind::Credential,
            Self::Network(_) => ErrorKind::Network,
            Self::Api { .. } => ErrorKind::Api,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Subprocess(_) => ErrorKind::Subprocess,
            Self::SecretStore(_) => ErrorKind::SecretStore,
            Self::Decode(_) => ErrorKind::Decode,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        if let Some(status) = err.status() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Self::Credential("check your credentials".to_string());
            }
            return Self::Api {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        Self::Network(err.to_string())
    }
}

impl From<keyring::Error> for AppError {
    fn from(err: keyring::Error) -> Self {
        Self::SecretStore(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

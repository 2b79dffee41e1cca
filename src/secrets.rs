//! Credential persistence in the OS credential store

use crate::error::AppError;
use crate::state::Credentials;
use async_trait::async_trait;

const SERVICE: &str = "jira-branch";
const ACCOUNT: &str = "credentials";

/// Opaque storage for the validated credentials
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet
    async fn load(&self) -> Result<Option<Credentials>, AppError>;

    async fn store(&self, credentials: &Credentials) -> Result<(), AppError>;

    /// Deleting a missing entry is not an error
    async fn clear(&self) -> Result<(), AppError>;
}

/// `SecretStore` backed by the platform keychain via `keyring`
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
    account: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self {
            service: SERVICE.to_string(),
            account: ACCOUNT.to_string(),
        }
    }
}

impl KeyringStore {
    fn entry(&self) -> Result<keyring::Entry, AppError> {
        Ok(keyring::Entry::new(&self.service, &self.account)?)
    }

    fn load_blocking(&self) -> Result<Option<Credentials>, AppError> {
        match self.entry()?.get_password() {
            Ok(raw) => decode_credentials(&raw).map(Some),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store_blocking(&self, credentials: &Credentials) -> Result<(), AppError> {
        let raw = encode_credentials(credentials)?;
        self.entry()?.set_password(&raw)?;
        Ok(())
    }

    fn clear_blocking(&self) -> Result<(), AppError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn encode_credentials(credentials: &Credentials) -> Result<String, AppError> {
    serde_json::to_string(credentials)
        .map_err(|e| AppError::SecretStore(format!("failed to serialize credentials: {e}")))
}

fn decode_credentials(raw: &str) -> Result<Credentials, AppError> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::SecretStore(format!("stored credentials are unreadable: {e}")))
}

async fn run_blocking<T, F>(job: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| AppError::SecretStore(format!("credential store task failed: {e}")))?
}

#[async_trait]
impl SecretStore for KeyringStore {
    async fn load(&self) -> Result<Option<Credentials>, AppError> {
        let store = self.clone();
        run_blocking(move || store.load_blocking()).await
    }

    async fn store(&self, credentials: &Credentials) -> Result<(), AppError> {
        let store = self.clone();
        let credentials = credentials.clone();
        run_blocking(move || store.store_blocking(&credentials)).await
    }

    async fn clear(&self) -> Result<(), AppError> {
        let store = self.clone();
        run_blocking(move || store.clear_blocking()).await
    }
}

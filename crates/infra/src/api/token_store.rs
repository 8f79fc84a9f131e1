//! Bearer token storage
//!
//! The executor only ever *reads* the token. Writing and clearing belong to
//! the login/logout flow, which calls [`TokenStore::set_token`] and
//! [`TokenStore::clear_token`] on the same store instance it injected into the
//! client.

use keyring::Entry;
use parking_lot::RwLock;
use tracing::{debug, warn};
use xanodash_domain::constants::{DEFAULT_KEYCHAIN_ACCOUNT, DEFAULT_KEYCHAIN_SERVICE};
use xanodash_domain::BearerToken;

use super::errors::ApiError;

/// Source of the current session's bearer token
///
/// This trait allows dependency injection and testing with in-memory stores.
pub trait TokenStore: Send + Sync {
    /// Current token, or `None` when signed out. Never fails; backend errors
    /// are logged and reported as `None`.
    fn token(&self) -> Option<BearerToken>;

    /// Store a token after login.
    ///
    /// # Errors
    /// Returns `ApiError::TokenStore` if the backing storage rejects the write.
    fn set_token(&self, token: BearerToken) -> Result<(), ApiError>;

    /// Remove the token at logout. Clearing an empty store succeeds.
    ///
    /// # Errors
    /// Returns `ApiError::TokenStore` if the backing storage fails.
    fn clear_token(&self) -> Result<(), ApiError>;
}

/// Process-local token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<BearerToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<BearerToken>) -> Self {
        Self { token: RwLock::new(Some(token.into())) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<BearerToken> {
        self.token.read().clone().filter(|token| !token.is_empty())
    }

    fn set_token(&self, token: BearerToken) -> Result<(), ApiError> {
        *self.token.write() = Some(token);
        Ok(())
    }

    fn clear_token(&self) -> Result<(), ApiError> {
        *self.token.write() = None;
        Ok(())
    }
}

/// Token store persisted in the OS keychain
pub struct KeychainTokenStore {
    service: String,
    account: String,
    entry: Entry,
}

impl KeychainTokenStore {
    /// # Errors
    /// Returns `ApiError::TokenStore` if the keychain entry cannot be created
    /// (e.g. empty service or account name).
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Result<Self, ApiError> {
        let service = service.into();
        let account = account.into();
        let entry = Entry::new(&service, &account)?;

        Ok(Self { service, account, entry })
    }

    /// Store under the default `xanodash`/`session` keychain slot
    ///
    /// # Errors
    /// See [`KeychainTokenStore::new`].
    pub fn default_slot() -> Result<Self, ApiError> {
        Self::new(DEFAULT_KEYCHAIN_SERVICE, DEFAULT_KEYCHAIN_ACCOUNT)
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn account(&self) -> &str {
        &self.account
    }
}

impl TokenStore for KeychainTokenStore {
    fn token(&self) -> Option<BearerToken> {
        match self.entry.get_password() {
            Ok(secret) => Some(BearerToken::new(secret)).filter(|token| !token.is_empty()),
            Err(keyring::Error::NoEntry) => None,
            Err(err) => {
                warn!(service = %self.service, account = %self.account, error = %err, "failed to read token from keychain");
                None
            }
        }
    }

    fn set_token(&self, token: BearerToken) -> Result<(), ApiError> {
        self.entry.set_password(token.expose())?;
        debug!(service = %self.service, account = %self.account, "token stored in keychain");
        Ok(())
    }

    fn clear_token(&self) -> Result<(), ApiError> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

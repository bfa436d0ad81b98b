//! Registration and login on top of a [`CredentialStore`] and a [`Hasher`].

pub mod password;
pub use self::password::{HashError, Hasher};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::store::{Account, CredentialStore, StoreError};

/// The user-facing error taxonomy.
///
/// Infrastructure failures carry no detail on purpose; the underlying cause
/// is logged where it happened and callers only see a generic failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Username or password missing or empty.
    #[error("username and password are required")]
    InvalidInput,

    /// Registration lost to an existing or concurrently created account.
    #[error("username already exists")]
    UsernameTaken,

    /// No account for the supplied username.
    #[error("user not found")]
    UserNotFound,

    /// The password did not match the stored hash.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The credential store failed or timed out.
    #[error("credential store unavailable")]
    StoreUnavailable,

    /// The hasher failed.
    #[error("internal error")]
    Internal,
}

/// Orchestrates the two operations of the service.
///
/// Holds no mutable state of its own; concurrent calls coordinate only
/// through the store's atomic insert.
#[derive(Debug, Clone)]
pub struct AuthService<S> {
    store: S,
    hasher: Hasher,
}

impl<S: CredentialStore> AuthService<S> {
    pub const fn new(store: S, hasher: Hasher) -> Self {
        Self { store, hasher }
    }

    /// Create an account for `username` with a salted hash of `password`.
    ///
    /// # Errors
    /// - [`AuthError::InvalidInput`] on empty fields, before any store call.
    /// - [`AuthError::UsernameTaken`] when the username exists, whether seen
    ///   by the lookup or by losing the insert race.
    /// - [`AuthError::StoreUnavailable`] / [`AuthError::Internal`] on
    ///   infrastructure failure. No retries.
    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, password: SecretString) -> Result<(), AuthError> {
        validate(username, &password)?;

        match self.store.find_by_username(username).await {
            Ok(Some(_)) => return Err(AuthError::UsernameTaken),
            Ok(None) => (),
            Err(err) => return Err(store_error(&err)),
        }

        let password_hash = self.hasher.hash(password).await.map_err(|err| {
            error!("Error hashing password: {err}");
            AuthError::Internal
        })?;

        let account = Account {
            username: username.to_string(),
            password_hash,
        };

        match self.store.insert(account).await {
            Ok(()) => {
                debug!("account created");
                Ok(())
            }
            // The lookup above is advisory; a concurrent registration may
            // have won the race since. The atomic insert is the real guard.
            Err(StoreError::Conflict) => Err(AuthError::UsernameTaken),
            Err(err) => Err(store_error(&err)),
        }
    }

    /// Verify `password` against the stored hash for `username`.
    ///
    /// Policy note: a missing account is reported as [`AuthError::UserNotFound`],
    /// distinct from [`AuthError::InvalidCredentials`], keeping the behavior
    /// of the original service at the cost of username enumeration.
    ///
    /// # Errors
    /// - [`AuthError::InvalidInput`] on empty fields, before any store call.
    /// - [`AuthError::UserNotFound`] / [`AuthError::InvalidCredentials`] as
    ///   domain outcomes.
    /// - [`AuthError::StoreUnavailable`] / [`AuthError::Internal`] on
    ///   infrastructure failure.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: SecretString) -> Result<(), AuthError> {
        validate(username, &password)?;

        let account = match self.store.find_by_username(username).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                debug!("user not found");
                return Err(AuthError::UserNotFound);
            }
            Err(err) => return Err(store_error(&err)),
        };

        let verified = self
            .hasher
            .verify(password, account.password_hash)
            .await
            .map_err(|err| {
                error!("Error verifying password: {err}");
                AuthError::Internal
            })?;

        if verified {
            debug!("login successful");
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

fn validate(username: &str, password: &SecretString) -> Result<(), AuthError> {
    if username.is_empty() || password.expose_secret().is_empty() {
        return Err(AuthError::InvalidInput);
    }

    Ok(())
}

fn store_error(err: &StoreError) -> AuthError {
    error!("Credential store error: {err}");

    AuthError::StoreUnavailable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryCredentialStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn secret(password: &str) -> SecretString {
        SecretString::from(password.to_string())
    }

    fn service() -> AuthService<MemoryCredentialStore> {
        AuthService::new(MemoryCredentialStore::new(), Hasher::new(8, 1, 1).unwrap())
    }

    /// Store wrapper that counts calls, to assert validation short-circuits.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryCredentialStore,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CredentialStore for CountingStore {
        async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_username(username).await
        }

        async fn insert(&self, account: Account) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.insert(account).await
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let auth = service();

        auth.register("alice", secret("secret1")).await.unwrap();
        auth.login("alice", secret("secret1")).await.unwrap();
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let auth = service();

        auth.register("alice", secret("secret1")).await.unwrap();

        let err = auth.login("alice", secret("wrong")).await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let auth = service();

        let err = auth.login("bob", secret("x")).await.unwrap_err();
        assert_eq!(err, AuthError::UserNotFound);
    }

    #[tokio::test]
    async fn test_duplicate_register() {
        let auth = service();

        auth.register("alice", secret("secret1")).await.unwrap();

        let err = auth.register("alice", secret("other")).await.unwrap_err();
        assert_eq!(err, AuthError::UsernameTaken);
    }

    #[tokio::test]
    async fn test_empty_fields_do_not_touch_store() {
        let store = Arc::new(CountingStore::default());
        let auth = AuthService::new(Arc::clone(&store), Hasher::new(8, 1, 1).unwrap());

        for (username, password) in [("", "secret"), ("alice", ""), ("", "")] {
            let err = auth.register(username, secret(password)).await.unwrap_err();
            assert_eq!(err, AuthError::InvalidInput);

            let err = auth.login(username, secret(password)).await.unwrap_err();
            assert_eq!(err, AuthError::InvalidInput);
        }

        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_concurrent_registers_single_winner() {
        let store = Arc::new(MemoryCredentialStore::new());
        let auth = Arc::new(AuthService::new(
            Arc::clone(&store),
            Hasher::new(8, 1, 1).unwrap(),
        ));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let auth = Arc::clone(&auth);
            tasks.push(tokio::spawn(async move {
                auth.register("alice", secret("secret1")).await
            }));
        }

        let mut winners = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(()) => winners += 1,
                Err(err) => assert_eq!(err, AuthError::UsernameTaken),
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_scenario_chain() {
        let auth = service();

        auth.register("alice", secret("secret1")).await.unwrap();
        auth.login("alice", secret("secret1")).await.unwrap();

        assert_eq!(
            auth.login("alice", secret("wrong")).await.unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            auth.login("bob", secret("x")).await.unwrap_err(),
            AuthError::UserNotFound
        );
        assert_eq!(
            auth.register("alice", secret("other")).await.unwrap_err(),
            AuthError::UsernameTaken
        );
    }
}

pub mod memory;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::instrument;

/// A stored credential: the username and the PHC-format hash of its password.
///
/// The hash is opaque outside the password hasher and is never serialized
/// back to clients. Accounts are created once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// An account with the same username already exists.
    #[error("account already exists")]
    Conflict,

    /// The store did not answer within the configured deadline.
    #[error("credential store timed out")]
    Timeout,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// True for the transient infrastructure failures, false for the
    /// domain-level duplicate key.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Database(_))
    }
}

/// Durable mapping from username to [`Account`] with write-time uniqueness.
///
/// `insert` is atomic with respect to the uniqueness check: of N concurrent
/// inserts for the same username exactly one succeeds and the rest get
/// [`StoreError::Conflict`]. A missing key on lookup is `Ok(None)`, never an
/// error.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    async fn insert(&self, account: Account) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: CredentialStore + ?Sized> CredentialStore for std::sync::Arc<S> {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        (**self).find_by_username(username).await
    }

    async fn insert(&self, account: Account) -> Result<(), StoreError> {
        (**self).insert(account).await
    }
}

/// PostgreSQL-backed [`CredentialStore`].
///
/// Every operation runs under `op_timeout`; on expiry the caller sees
/// [`StoreError::Timeout`] instead of a hung request. No retries.
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
    op_timeout: Duration,
}

impl PgCredentialStore {
    #[must_use]
    pub const fn new(pool: PgPool, op_timeout: Duration) -> Self {
        Self { pool, op_timeout }
    }

    /// Connect to the database and wrap the pool.
    ///
    /// # Errors
    /// Returns an error if the connection cannot be established.
    pub async fn connect(dsn: &str, op_timeout: Duration) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await?;

        Ok(Self::new(pool, op_timeout))
    }

    /// Create the accounts table when missing.
    ///
    /// The primary key on `username` carries the uniqueness guarantee that
    /// `insert` relies on.
    ///
    /// # Errors
    /// Returns an error if the DDL statement fails.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS accounts (
                username TEXT PRIMARY KEY,
                password_hash TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let query = sqlx::query("SELECT username, password_hash FROM accounts WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool);

        let row = timeout(self.op_timeout, query)
            .await
            .map_err(|_| StoreError::Timeout)??;

        Ok(row.map(|row| Account {
            username: row.get("username"),
            password_hash: row.get("password_hash"),
        }))
    }

    #[instrument(skip(self, account), fields(username = %account.username))]
    async fn insert(&self, account: Account) -> Result<(), StoreError> {
        // The existence check and the write are a single statement, so two
        // racing inserts resolve to one winner inside the database.
        let query = sqlx::query(
            "INSERT INTO accounts (username, password_hash) VALUES ($1, $2)
             ON CONFLICT (username) DO NOTHING",
        )
        .bind(&account.username)
        .bind(&account.password_hash)
        .execute(&self.pool);

        let result = timeout(self.op_timeout, query)
            .await
            .map_err(|_| StoreError::Timeout)??;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict);
        }

        Ok(())
    }
}

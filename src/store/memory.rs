//! In-memory credential store, used by the service-level tests.

use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::{Account, CredentialStore, StoreError};

/// `HashMap`-backed [`CredentialStore`].
///
/// The map lock makes the check-and-write in `insert` atomic, matching the
/// uniqueness guarantee of [`super::PgCredentialStore`].
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    accounts: Mutex<HashMap<String, Account>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self
            .accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        Ok(accounts.get(username).cloned())
    }

    async fn insert(&self, account: Account) -> Result<(), StoreError> {
        let mut accounts = self
            .accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match accounts.entry(account.username.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict),
            Entry::Vacant(slot) => {
                slot.insert(account);
                Ok(())
            }
        }
    }
}

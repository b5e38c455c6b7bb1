use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use lingo_core::model::{Account, AccountId};

use crate::keys;
use crate::records::{AccountRecord, ProgressMap, SessionRecord, UnlockMap, decode, encode};

/// Errors surfaced by persistence adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// The injected persistence port: a durable string key-value substrate.
///
/// Implementations may lose all data at any time (a cleared browser
/// profile, a deleted file); callers are expected to degrade to defaults
/// rather than fail hard.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the substrate cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the substrate cannot be written.
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete the value stored under `key`. Deleting a missing key is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the substrate cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Simple in-memory store implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Typed access to the persisted records, over any key-value backend.
///
/// Every mutation rewrites the whole blob for its key; the substrate has
/// no partial-update primitive.
#[derive(Clone)]
pub struct Storage {
    kv: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    // ─── Accounts ──────────────────────────────────────────────────────────

    /// Load the full account collection; absent key decodes to empty.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on substrate failure or if a stored record is
    /// malformed.
    pub async fn load_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let Some(raw) = self.kv.get(keys::ACCOUNTS).await? else {
            return Ok(Vec::new());
        };
        let records: Vec<AccountRecord> = decode(&raw)?;
        records
            .into_iter()
            .map(|record| {
                record
                    .into_account()
                    .map_err(|err| StoreError::Serialization(err.to_string()))
            })
            .collect()
    }

    /// Rewrite the full account collection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on substrate failure.
    pub async fn save_accounts(&self, accounts: &[Account]) -> Result<(), StoreError> {
        let records: Vec<AccountRecord> = accounts.iter().map(AccountRecord::from_account).collect();
        self.kv.put(keys::ACCOUNTS, &encode(&records)?).await
    }

    // ─── Session ───────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `StoreError` on substrate failure or a malformed record.
    pub async fn load_session(&self) -> Result<Option<SessionRecord>, StoreError> {
        match self.kv.get(keys::SESSION).await? {
            Some(raw) => Ok(Some(decode(&raw)?)),
            None => Ok(None),
        }
    }

    /// # Errors
    ///
    /// Returns `StoreError` on substrate failure.
    pub async fn save_session(&self, session: &SessionRecord) -> Result<(), StoreError> {
        self.kv.put(keys::SESSION, &encode(session)?).await
    }

    /// # Errors
    ///
    /// Returns `StoreError` on substrate failure.
    pub async fn clear_session(&self) -> Result<(), StoreError> {
        self.kv.remove(keys::SESSION).await
    }

    // ─── Progress / unlock records ─────────────────────────────────────────

    /// Load an account's progress map. `None` means the account has no
    /// record at all (distinct from an empty map, which migration cares
    /// about).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on substrate failure or a malformed record.
    pub async fn load_progress(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<ProgressMap>, StoreError> {
        match self.kv.get(&keys::progress(account_id)).await? {
            Some(raw) => Ok(Some(decode(&raw)?)),
            None => Ok(None),
        }
    }

    /// # Errors
    ///
    /// Returns `StoreError` on substrate failure.
    pub async fn save_progress(
        &self,
        account_id: &AccountId,
        progress: &ProgressMap,
    ) -> Result<(), StoreError> {
        self.kv
            .put(&keys::progress(account_id), &encode(progress)?)
            .await
    }

    /// # Errors
    ///
    /// Returns `StoreError` on substrate failure or a malformed record.
    pub async fn load_unlocked(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<UnlockMap>, StoreError> {
        match self.kv.get(&keys::unlocked(account_id)).await? {
            Some(raw) => Ok(Some(decode(&raw)?)),
            None => Ok(None),
        }
    }

    /// # Errors
    ///
    /// Returns `StoreError` on substrate failure.
    pub async fn save_unlocked(
        &self,
        account_id: &AccountId,
        unlocked: &UnlockMap,
    ) -> Result<(), StoreError> {
        self.kv
            .put(&keys::unlocked(account_id), &encode(unlocked)?)
            .await
    }

    /// Delete both of an account's namespaced records.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on substrate failure.
    pub async fn remove_account_data(&self, account_id: &AccountId) -> Result<(), StoreError> {
        self.kv.remove(&keys::progress(account_id)).await?;
        self.kv.remove(&keys::unlocked(account_id)).await
    }

    // ─── Legacy (pre-namespacing) records ──────────────────────────────────

    /// # Errors
    ///
    /// Returns `StoreError` on substrate failure or a malformed record.
    pub async fn load_legacy_progress(&self) -> Result<Option<ProgressMap>, StoreError> {
        match self.kv.get(keys::LEGACY_PROGRESS).await? {
            Some(raw) => Ok(Some(decode(&raw)?)),
            None => Ok(None),
        }
    }

    /// # Errors
    ///
    /// Returns `StoreError` on substrate failure or a malformed record.
    pub async fn load_legacy_unlocked(&self) -> Result<Option<UnlockMap>, StoreError> {
        match self.kv.get(keys::LEGACY_UNLOCKED).await? {
            Some(raw) => Ok(Some(decode(&raw)?)),
            None => Ok(None),
        }
    }

    /// Drop both global records once migration has drained them.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on substrate failure.
    pub async fn remove_legacy_data(&self) -> Result<(), StoreError> {
        self.kv.remove(keys::LEGACY_PROGRESS).await?;
        self.kv.remove(keys::LEGACY_UNLOCKED).await
    }
}

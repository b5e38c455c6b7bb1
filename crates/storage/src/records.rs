use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;

use lingo_core::model::{Account, AccountError, AccountId, LessonId, Percent};

use crate::store::StoreError;

/// Per-account lesson progress: latest quiz percentage per lesson.
pub type ProgressMap = BTreeMap<LessonId, Percent>;

/// Per-account unlock flags per lesson.
pub type UnlockMap = BTreeMap<LessonId, bool>;

/// Persisted shape for an account.
///
/// This mirrors the domain `Account` so the store can serialize and
/// deserialize without leaking persistence concerns into the domain layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: AccountId,
    pub username: String,
    pub password_hash: String,
    pub display_name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AccountRecord {
    #[must_use]
    pub fn from_account(account: &Account) -> Self {
        Self {
            id: account.id(),
            username: account.username().to_owned(),
            password_hash: account.password_hash().to_owned(),
            display_name: account.display_name().to_owned(),
            email: account.email().map(str::to_owned),
            created_at: account.created_at(),
        }
    }

    /// Convert the record back into a domain `Account`.
    ///
    /// # Errors
    ///
    /// Returns `AccountError` if the stored fields fail validation.
    pub fn into_account(self) -> Result<Account, AccountError> {
        Account::new(
            self.id,
            self.username,
            self.password_hash,
            Some(self.display_name),
            self.email,
            self.created_at,
        )
    }
}

/// The session pointer: which account is currently signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub account_id: AccountId,
    pub started_at: DateTime<Utc>,
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|err| StoreError::Serialization(err.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, StoreError> {
    serde_json::from_str(raw).map_err(|err| StoreError::Serialization(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_core::time::fixed_now;

    #[test]
    fn account_record_roundtrip() {
        let account = Account::new(
            AccountId::generate(),
            "alice",
            "$argon2id$fake-hash",
            Some("Alice".into()),
            Some("alice@example.com".into()),
            fixed_now(),
        )
        .unwrap();

        let raw = encode(&AccountRecord::from_account(&account)).unwrap();
        let record: AccountRecord = decode(&raw).unwrap();
        let restored = record.into_account().unwrap();
        assert_eq!(restored, account);
    }

    #[test]
    fn progress_map_roundtrip() {
        let mut map = ProgressMap::new();
        map.insert(LessonId::new("greetings"), Percent::new(85).unwrap());
        map.insert(LessonId::new("numbers"), Percent::new(40).unwrap());

        let raw = encode(&map).unwrap();
        let decoded: ProgressMap = decode(&raw).unwrap();
        assert_eq!(decoded, map);
    }

    #[test]
    fn out_of_range_stored_percent_is_a_decode_error() {
        let raw = r#"{"greetings":250}"#;
        let result: Result<ProgressMap, StoreError> = decode(raw);
        assert!(result.is_err());
    }

    #[test]
    fn session_record_roundtrip() {
        let session = SessionRecord {
            account_id: AccountId::generate(),
            started_at: fixed_now(),
        };
        let raw = encode(&session).unwrap();
        let decoded: SessionRecord = decode(&raw).unwrap();
        assert_eq!(decoded, session);
    }
}

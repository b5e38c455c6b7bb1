use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::AccountId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccountError {
    #[error("username cannot be empty")]
    EmptyUsername,

    #[error("password hash cannot be empty")]
    EmptyPasswordHash,
}

//
// ─── ACCOUNT ───────────────────────────────────────────────────────────────────
//

/// A registered learner.
///
/// Usernames are unique (case-sensitive) across the account collection;
/// uniqueness is enforced by the account store, not here. Passwords are
/// only ever carried as a salted hash.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: AccountId,
    username: String,
    password_hash: String,
    display_name: String,
    email: Option<String>,
    created_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new Account.
    ///
    /// The display name falls back to the username when absent or blank,
    /// and a blank email is normalized to `None`.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::EmptyUsername` if the username is empty or
    /// whitespace-only, and `AccountError::EmptyPasswordHash` if no hash
    /// is provided.
    pub fn new(
        id: AccountId,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        display_name: Option<String>,
        email: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, AccountError> {
        let username = username.into().trim().to_owned();
        if username.is_empty() {
            return Err(AccountError::EmptyUsername);
        }

        let password_hash = password_hash.into();
        if password_hash.is_empty() {
            return Err(AccountError::EmptyPasswordHash);
        }

        let display_name = display_name
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| username.clone());

        let email = email
            .map(|e| e.trim().to_owned())
            .filter(|e| !e.is_empty());

        Ok(Self {
            id,
            username,
            password_hash,
            display_name,
            email,
            created_at,
        })
    }

    /// Returns a copy with the given profile fields applied.
    ///
    /// `None` leaves a field unchanged; a blank value resets the display
    /// name to the username and clears the email.
    #[must_use]
    pub fn with_profile(&self, display_name: Option<String>, email: Option<String>) -> Self {
        let mut updated = self.clone();
        if let Some(name) = display_name {
            let name = name.trim().to_owned();
            updated.display_name = if name.is_empty() {
                self.username.clone()
            } else {
                name
            };
        }
        if let Some(email) = email {
            let email = email.trim().to_owned();
            updated.email = if email.is_empty() { None } else { Some(email) };
        }
        updated
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> AccountId {
        self.id
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

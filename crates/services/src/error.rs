//! Shared error types for the services crate.

use thiserror::Error;

use lingo_core::model::AccountError;
use lingo_core::password::PasswordError;
use storage::StoreError;

/// Errors emitted by `AccountService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("username is already taken")]
    DuplicateUsername,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("account not found")]
    NotFound,
    #[error("the administrative account cannot be changed")]
    Forbidden,
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressStoreError {
    #[error(transparent)]
    Storage(#[from] StoreError),
}

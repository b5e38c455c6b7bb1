//! Key layout for the persisted blobs.
//!
//! Account-scoped records are namespaced by account id; the bare
//! `progress`/`unlocked` keys are the pre-namespacing layout older
//! installs wrote, kept only so migration can drain them.

use lingo_core::model::AccountId;

pub const ACCOUNTS: &str = "lingo:accounts";
pub const SESSION: &str = "lingo:session";

pub const LEGACY_PROGRESS: &str = "lingo:progress";
pub const LEGACY_UNLOCKED: &str = "lingo:unlocked";

/// Per-account progress map key.
#[must_use]
pub fn progress(account_id: &AccountId) -> String {
    format!("lingo:progress:{account_id}")
}

/// Per-account unlock map key.
#[must_use]
pub fn unlocked(account_id: &AccountId) -> String {
    format!("lingo:unlocked:{account_id}")
}

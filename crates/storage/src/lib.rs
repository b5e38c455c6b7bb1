#![forbid(unsafe_code)]

pub mod keys;
pub mod records;
pub mod sqlite;
pub mod store;

pub use records::{AccountRecord, ProgressMap, SessionRecord, UnlockMap};
pub use store::{InMemoryStore, KeyValueStore, Storage, StoreError};

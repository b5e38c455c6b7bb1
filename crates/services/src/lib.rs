#![forbid(unsafe_code)]

pub mod account_service;
pub mod error;
pub mod events;
pub mod progress_service;

pub use lingo_core::Clock;

pub use account_service::{ADMIN_USERNAME, AccountService, ProfileUpdate};
pub use error::{AuthError, ProgressStoreError};
pub use events::{ChangeEvent, ChangeNotifier};
pub use progress_service::ProgressService;

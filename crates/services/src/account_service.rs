use lingo_core::Clock;
use lingo_core::model::{Account, AccountId};
use lingo_core::password;
use storage::Storage;
use storage::records::SessionRecord;

use crate::error::AuthError;
use crate::events::{ChangeEvent, ChangeNotifier};

/// Username of the seeded administrative account. The account is
/// undeletable and its profile cannot be edited.
pub const ADMIN_USERNAME: &str = "admin";

const ADMIN_DEFAULT_PASSWORD: &str = "admin";

/// Partial profile update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// Orchestrates the account collection and the session pointer.
///
/// Every mutation rewrites the whole collection blob; there is no indexed
/// update primitive underneath.
#[derive(Clone)]
pub struct AccountService {
    clock: Clock,
    storage: Storage,
    notifier: ChangeNotifier,
}

impl AccountService {
    #[must_use]
    pub fn new(clock: Clock, storage: Storage, notifier: ChangeNotifier) -> Self {
        Self {
            clock,
            storage,
            notifier,
        }
    }

    /// Seeds the administrative account if it is missing.
    ///
    /// Idempotent; meant to run on every start before anything else
    /// touches the account collection.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` on storage or hashing failures.
    pub async fn bootstrap(&self) -> Result<(), AuthError> {
        let mut accounts = self.storage.load_accounts().await?;
        if accounts.iter().any(|a| a.username() == ADMIN_USERNAME) {
            return Ok(());
        }

        let admin = Account::new(
            AccountId::generate(),
            ADMIN_USERNAME,
            password::hash(ADMIN_DEFAULT_PASSWORD)?,
            Some("Administrator".into()),
            None,
            self.clock.now(),
        )?;
        accounts.push(admin);
        self.storage.save_accounts(&accounts).await?;
        self.notifier.notify(ChangeEvent::Accounts);
        Ok(())
    }

    /// Registers a new account and signs it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::DuplicateUsername` when the username is taken
    /// (case-sensitive exact match), `AuthError::Password` for an empty
    /// password, and `AuthError` validation/storage failures otherwise.
    pub async fn register(
        &self,
        username: &str,
        plain_password: &str,
        display_name: Option<String>,
        email: Option<String>,
    ) -> Result<Account, AuthError> {
        let username = username.trim();
        let mut accounts = self.storage.load_accounts().await?;
        if accounts.iter().any(|a| a.username() == username) {
            return Err(AuthError::DuplicateUsername);
        }

        let account = Account::new(
            AccountId::generate(),
            username,
            password::hash(plain_password)?,
            display_name,
            email,
            self.clock.now(),
        )?;

        accounts.push(account.clone());
        self.storage.save_accounts(&accounts).await?;
        self.start_session(account.id()).await?;

        self.notifier.notify(ChangeEvent::Accounts);
        self.notifier.notify(ChangeEvent::Session);
        Ok(account)
    }

    /// Signs an existing account in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the username is
    /// unknown or the password does not match; the two cases are not
    /// distinguishable from the outside.
    pub async fn login(&self, username: &str, plain_password: &str) -> Result<Account, AuthError> {
        let accounts = self.storage.load_accounts().await?;
        let account = accounts
            .iter()
            .find(|a| a.username() == username)
            .ok_or(AuthError::InvalidCredentials)?;

        let matches = password::verify(plain_password, account.password_hash())
            .map_err(|_| AuthError::InvalidCredentials)?;
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        self.start_session(account.id()).await?;
        self.notifier.notify(ChangeEvent::Session);
        Ok(account.clone())
    }

    /// Clears the session pointer; the account collection is untouched.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the pointer cannot be removed.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.storage.clear_session().await?;
        self.notifier.notify(ChangeEvent::Session);
        Ok(())
    }

    /// Resolves the session pointer against the account collection.
    ///
    /// Fails closed: storage problems and dangling pointers both read as
    /// "nobody signed in".
    pub async fn current_session(&self) -> Option<Account> {
        let session = match self.storage.load_session().await {
            Ok(session) => session?,
            Err(err) => {
                tracing::warn!(error = %err, "session read failed; treating as signed out");
                return None;
            }
        };

        match self.storage.load_accounts().await {
            Ok(accounts) => accounts.into_iter().find(|a| a.id() == session.account_id),
            Err(err) => {
                tracing::warn!(error = %err, "account read failed; treating as signed out");
                None
            }
        }
    }

    /// Applies a partial profile update.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotFound` for an unknown account id and
    /// `AuthError::Forbidden` for the administrative account.
    pub async fn update_profile(
        &self,
        account_id: AccountId,
        update: ProfileUpdate,
    ) -> Result<Account, AuthError> {
        let mut accounts = self.storage.load_accounts().await?;
        let position = accounts
            .iter()
            .position(|a| a.id() == account_id)
            .ok_or(AuthError::NotFound)?;
        if accounts[position].username() == ADMIN_USERNAME {
            return Err(AuthError::Forbidden);
        }

        let updated = accounts[position].with_profile(update.display_name, update.email);
        accounts[position] = updated.clone();
        self.storage.save_accounts(&accounts).await?;

        self.notifier.notify(ChangeEvent::Accounts);
        if self.session_points_at(account_id).await {
            self.notifier.notify(ChangeEvent::Session);
        }
        Ok(updated)
    }

    /// Deletes an account and cascades deletion of its progress records.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotFound` for an unknown account id and
    /// `AuthError::Forbidden` for the administrative account.
    pub async fn delete_account(&self, account_id: AccountId) -> Result<(), AuthError> {
        let mut accounts = self.storage.load_accounts().await?;
        let position = accounts
            .iter()
            .position(|a| a.id() == account_id)
            .ok_or(AuthError::NotFound)?;
        if accounts[position].username() == ADMIN_USERNAME {
            return Err(AuthError::Forbidden);
        }

        accounts.remove(position);
        self.storage.save_accounts(&accounts).await?;
        self.storage.remove_account_data(&account_id).await?;

        self.notifier.notify(ChangeEvent::Accounts);
        self.notifier.notify(ChangeEvent::Progress(account_id));
        Ok(())
    }

    async fn start_session(&self, account_id: AccountId) -> Result<(), AuthError> {
        let session = SessionRecord {
            account_id,
            started_at: self.clock.now(),
        };
        self.storage.save_session(&session).await?;
        Ok(())
    }

    async fn session_points_at(&self, account_id: AccountId) -> bool {
        matches!(
            self.storage.load_session().await,
            Ok(Some(session)) if session.account_id == account_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_core::time::fixed_clock;

    fn service() -> AccountService {
        AccountService::new(fixed_clock(), Storage::in_memory(), ChangeNotifier::new())
    }

    #[tokio::test]
    async fn bootstrap_seeds_admin_once() {
        let service = service();
        service.bootstrap().await.unwrap();
        service.bootstrap().await.unwrap();

        let accounts = service.storage.load_accounts().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].username(), ADMIN_USERNAME);
    }

    #[tokio::test]
    async fn register_signs_the_new_account_in() {
        let service = service();
        let account = service
            .register("alice", "pw1", None, None)
            .await
            .unwrap();

        let session = service.current_session().await.unwrap();
        assert_eq!(session.id(), account.id());
        assert_eq!(session.username(), "alice");
    }

    #[tokio::test]
    async fn register_rejects_taken_username() {
        let service = service();
        service.register("alice", "pw1", None, None).await.unwrap();

        let err = service
            .register("alice", "other", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUsername));
    }

    #[tokio::test]
    async fn username_comparison_is_case_sensitive() {
        let service = service();
        service.register("alice", "pw1", None, None).await.unwrap();

        // a different casing is a different username
        service.register("Alice", "pw2", None, None).await.unwrap();

        let err = service.login("ALICE", "pw1").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_round_trip_and_rejection() {
        let service = service();
        let registered = service
            .register("alice", "pw1", None, None)
            .await
            .unwrap();
        service.logout().await.unwrap();
        assert!(service.current_session().await.is_none());

        let logged_in = service.login("alice", "pw1").await.unwrap();
        assert_eq!(logged_in.id(), registered.id());

        let err = service.login("alice", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        let err = service.login("nobody", "pw1").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn update_profile_is_partial() {
        let service = service();
        let account = service
            .register("alice", "pw1", None, Some("alice@example.com".into()))
            .await
            .unwrap();

        let updated = service
            .update_profile(
                account.id(),
                ProfileUpdate {
                    display_name: Some("Alice Prime".into()),
                    email: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.display_name(), "Alice Prime");
        assert_eq!(updated.email(), Some("alice@example.com"));

        // the session resolves to the refreshed record
        let session = service.current_session().await.unwrap();
        assert_eq!(session.display_name(), "Alice Prime");
    }

    #[tokio::test]
    async fn update_profile_unknown_account_is_not_found() {
        let service = service();
        let err = service
            .update_profile(AccountId::generate(), ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }

    #[tokio::test]
    async fn admin_account_is_immutable_and_undeletable() {
        let service = service();
        service.bootstrap().await.unwrap();
        let admin = service.login(ADMIN_USERNAME, "admin").await.unwrap();

        let err = service
            .update_profile(admin.id(), ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Forbidden));

        let err = service.delete_account(admin.id()).await.unwrap_err();
        assert!(matches!(err, AuthError::Forbidden));

        let accounts = service.storage.load_accounts().await.unwrap();
        assert_eq!(accounts.len(), 1);
    }

    #[tokio::test]
    async fn delete_account_drops_record_and_session_resolution() {
        let service = service();
        let account = service
            .register("alice", "pw1", None, None)
            .await
            .unwrap();

        service.delete_account(account.id()).await.unwrap();

        assert!(service.storage.load_accounts().await.unwrap().is_empty());
        // the stale session pointer no longer resolves
        assert!(service.current_session().await.is_none());
    }

    #[tokio::test]
    async fn mutations_emit_change_events() {
        let service = service();
        let mut rx = service.notifier.subscribe();

        service.register("alice", "pw1", None, None).await.unwrap();
        assert_eq!(rx.try_recv().unwrap(), ChangeEvent::Accounts);
        assert_eq!(rx.try_recv().unwrap(), ChangeEvent::Session);

        service.logout().await.unwrap();
        assert_eq!(rx.try_recv().unwrap(), ChangeEvent::Session);
    }
}

use std::sync::Arc;

use lingo_core::model::{AccountId, Catalog, LessonId, Percent};
use lingo_core::unlock;
use storage::Storage;
use storage::records::ProgressMap;

use crate::error::ProgressStoreError;
use crate::events::{ChangeEvent, ChangeNotifier};

/// Per-account lesson progress and unlock state.
///
/// Reads fail closed: on any persistence problem they log and return the
/// defaults (zero progress, only the first lesson unlocked). Writes
/// surface a typed error the caller may ignore.
#[derive(Clone)]
pub struct ProgressService {
    storage: Storage,
    catalog: Arc<Catalog>,
    notifier: ChangeNotifier,
}

impl ProgressService {
    #[must_use]
    pub fn new(storage: Storage, catalog: Arc<Catalog>, notifier: ChangeNotifier) -> Self {
        Self {
            storage,
            catalog,
            notifier,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Stores a quiz result and unlocks the successor lesson when the
    /// score passes the threshold.
    ///
    /// The latest score always replaces the stored one, even when lower
    /// (kept as observed in production pending a product decision on
    /// best-score retention). Unlock flags are only ever added, so a
    /// retake can never re-lock a lesson.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if persistence fails.
    pub async fn record_quiz_result(
        &self,
        account_id: &AccountId,
        lesson_id: &LessonId,
        score: Percent,
    ) -> Result<(), ProgressStoreError> {
        let mut progress = self
            .storage
            .load_progress(account_id)
            .await?
            .unwrap_or_default();
        progress.insert(lesson_id.clone(), score);
        self.storage.save_progress(account_id, &progress).await?;

        if let Some(next) = unlock::next_unlock(&self.catalog, lesson_id, score) {
            let mut unlocked = self
                .storage
                .load_unlocked(account_id)
                .await?
                .unwrap_or_default();
            unlocked.insert(next, true);
            self.storage.save_unlocked(account_id, &unlocked).await?;
        }

        self.notifier.notify(ChangeEvent::Progress(*account_id));
        Ok(())
    }

    /// Latest recorded percentage for a lesson; zero when absent.
    pub async fn progress(&self, account_id: &AccountId, lesson_id: &LessonId) -> Percent {
        self.all_progress(account_id)
            .await
            .get(lesson_id)
            .copied()
            .unwrap_or(Percent::ZERO)
    }

    /// The full progress map for an account; empty when absent.
    pub async fn all_progress(&self, account_id: &AccountId) -> ProgressMap {
        match self.storage.load_progress(account_id).await {
            Ok(progress) => progress.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(error = %err, %account_id, "progress read failed; returning empty");
                ProgressMap::default()
            }
        }
    }

    /// Whether a lesson is accessible for this account.
    ///
    /// The lowest-level lesson is always accessible, stored state or not.
    pub async fn is_unlocked(&self, account_id: &AccountId, lesson_id: &LessonId) -> bool {
        if self.catalog.first().id() == lesson_id {
            return true;
        }

        match self.storage.load_unlocked(account_id).await {
            Ok(unlocked) => unlocked
                .unwrap_or_default()
                .get(lesson_id)
                .copied()
                .unwrap_or(false),
            Err(err) => {
                tracing::warn!(error = %err, %account_id, "unlock read failed; treating as locked");
                false
            }
        }
    }

    /// Deletes both of the account's records, reverting it to a fresh
    /// state (only the first lesson accessible). The account itself is
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if persistence fails.
    pub async fn reset_progress(&self, account_id: &AccountId) -> Result<(), ProgressStoreError> {
        self.storage.remove_account_data(account_id).await?;
        self.notifier.notify(ChangeEvent::Progress(*account_id));
        Ok(())
    }

    /// Adopts progress written by installs that predate per-account
    /// namespacing.
    ///
    /// Each global record is copied only when the account has no
    /// namespaced record for it yet; the globals are deleted afterwards
    /// either way, which makes a second call a no-op. Safe to run on
    /// every session start.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if persistence fails.
    pub async fn migrate_legacy_data(
        &self,
        account_id: &AccountId,
    ) -> Result<(), ProgressStoreError> {
        let legacy_progress = self.storage.load_legacy_progress().await?;
        let legacy_unlocked = self.storage.load_legacy_unlocked().await?;
        if legacy_progress.is_none() && legacy_unlocked.is_none() {
            return Ok(());
        }

        if let Some(progress) = legacy_progress {
            if self.storage.load_progress(account_id).await?.is_none() {
                self.storage.save_progress(account_id, &progress).await?;
            }
        }
        if let Some(unlocked) = legacy_unlocked {
            if self.storage.load_unlocked(account_id).await?.is_none() {
                self.storage.save_unlocked(account_id, &unlocked).await?;
            }
        }

        self.storage.remove_legacy_data().await?;
        tracing::info!(%account_id, "migrated pre-namespacing progress records");
        self.notifier.notify(ChangeEvent::Progress(*account_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_core::model::Lesson;

    fn catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::new(vec![
                Lesson::new(LessonId::new("greetings"), "Greetings", None, 1).unwrap(),
                Lesson::new(LessonId::new("numbers"), "Numbers", None, 2).unwrap(),
                Lesson::new(LessonId::new("sentences"), "Basic Sentences", None, 3).unwrap(),
            ])
            .unwrap(),
        )
    }

    fn service() -> ProgressService {
        ProgressService::new(Storage::in_memory(), catalog(), ChangeNotifier::new())
    }

    fn pct(value: u8) -> Percent {
        Percent::new(value).unwrap()
    }

    #[tokio::test]
    async fn fresh_account_has_only_first_lesson_unlocked() {
        let service = service();
        let id = AccountId::generate();

        assert!(service.is_unlocked(&id, &LessonId::new("greetings")).await);
        assert!(!service.is_unlocked(&id, &LessonId::new("numbers")).await);
        assert!(!service.is_unlocked(&id, &LessonId::new("sentences")).await);
        assert_eq!(
            service.progress(&id, &LessonId::new("greetings")).await,
            Percent::ZERO
        );
        assert!(service.all_progress(&id).await.is_empty());
    }

    #[tokio::test]
    async fn passing_score_unlocks_the_next_lesson() {
        let service = service();
        let id = AccountId::generate();

        service
            .record_quiz_result(&id, &LessonId::new("greetings"), pct(85))
            .await
            .unwrap();

        assert_eq!(
            service.progress(&id, &LessonId::new("greetings")).await,
            pct(85)
        );
        assert!(service.is_unlocked(&id, &LessonId::new("numbers")).await);
        // only the immediate successor opens
        assert!(!service.is_unlocked(&id, &LessonId::new("sentences")).await);
    }

    #[tokio::test]
    async fn failing_score_records_but_unlocks_nothing() {
        let service = service();
        let id = AccountId::generate();

        service
            .record_quiz_result(&id, &LessonId::new("greetings"), pct(69))
            .await
            .unwrap();

        assert_eq!(
            service.progress(&id, &LessonId::new("greetings")).await,
            pct(69)
        );
        assert!(!service.is_unlocked(&id, &LessonId::new("numbers")).await);
    }

    #[tokio::test]
    async fn retake_with_lower_score_keeps_unlock() {
        let service = service();
        let id = AccountId::generate();
        let greetings = LessonId::new("greetings");

        service
            .record_quiz_result(&id, &greetings, pct(85))
            .await
            .unwrap();
        assert!(service.is_unlocked(&id, &LessonId::new("numbers")).await);

        service
            .record_quiz_result(&id, &greetings, pct(40))
            .await
            .unwrap();

        // last write wins for the score
        assert_eq!(service.progress(&id, &greetings).await, pct(40));
        // but the unlock never rolls back
        assert!(service.is_unlocked(&id, &LessonId::new("numbers")).await);
    }

    #[tokio::test]
    async fn recording_the_same_score_twice_changes_nothing() {
        let service = service();
        let id = AccountId::generate();
        let greetings = LessonId::new("greetings");

        service
            .record_quiz_result(&id, &greetings, pct(70))
            .await
            .unwrap();
        let first = service.all_progress(&id).await;

        service
            .record_quiz_result(&id, &greetings, pct(70))
            .await
            .unwrap();
        assert_eq!(service.all_progress(&id).await, first);
        assert!(service.is_unlocked(&id, &LessonId::new("numbers")).await);
    }

    #[tokio::test]
    async fn last_lesson_pass_is_a_quiet_no_op() {
        let service = service();
        let id = AccountId::generate();

        service
            .record_quiz_result(&id, &LessonId::new("sentences"), pct(100))
            .await
            .unwrap();
        assert_eq!(
            service.progress(&id, &LessonId::new("sentences")).await,
            pct(100)
        );
    }

    #[tokio::test]
    async fn unknown_lesson_score_is_stored_without_unlocking() {
        let service = service();
        let id = AccountId::generate();
        let mystery = LessonId::new("mystery");

        service
            .record_quiz_result(&id, &mystery, pct(100))
            .await
            .unwrap();

        assert_eq!(service.progress(&id, &mystery).await, pct(100));
        assert!(!service.is_unlocked(&id, &LessonId::new("numbers")).await);
        assert!(!service.is_unlocked(&id, &mystery).await);
    }

    #[tokio::test]
    async fn reset_progress_reverts_to_fresh_state() {
        let service = service();
        let id = AccountId::generate();

        service
            .record_quiz_result(&id, &LessonId::new("greetings"), pct(85))
            .await
            .unwrap();
        service.reset_progress(&id).await.unwrap();

        assert!(service.all_progress(&id).await.is_empty());
        assert!(service.is_unlocked(&id, &LessonId::new("greetings")).await);
        assert!(!service.is_unlocked(&id, &LessonId::new("numbers")).await);
    }

    #[tokio::test]
    async fn progress_is_scoped_per_account() {
        let service = service();
        let alice = AccountId::generate();
        let bob = AccountId::generate();

        service
            .record_quiz_result(&alice, &LessonId::new("greetings"), pct(85))
            .await
            .unwrap();

        assert!(service.is_unlocked(&alice, &LessonId::new("numbers")).await);
        assert!(!service.is_unlocked(&bob, &LessonId::new("numbers")).await);
        assert_eq!(
            service.progress(&bob, &LessonId::new("greetings")).await,
            Percent::ZERO
        );
    }
}

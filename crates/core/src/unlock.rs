//! Progression rules for the linear curriculum.
//!
//! Pure functions only: callers persist whatever these decide. A quiz score
//! at or above [`UNLOCK_THRESHOLD`] on one lesson opens the lesson one level
//! above it. Unlocking is one-directional; nothing here ever re-locks.

use crate::model::{Catalog, LessonId, Percent};

/// Minimum quiz score that completes a lesson and opens its successor.
pub const UNLOCK_THRESHOLD: Percent = Percent::UNLOCK_THRESHOLD;

/// Whether a score passes the completion threshold.
#[must_use]
pub fn passes(score: Percent) -> bool {
    score >= UNLOCK_THRESHOLD
}

/// Decides which lesson a quiz result should unlock, if any.
///
/// Returns the id of the lesson one level above the completed one when the
/// score passes the threshold and such a lesson exists. A failing score, an
/// id missing from the catalog, or the end of the curriculum all yield
/// `None`.
#[must_use]
pub fn next_unlock(catalog: &Catalog, completed: &LessonId, score: Percent) -> Option<LessonId> {
    if !passes(score) {
        return None;
    }
    catalog
        .successor_of(completed)
        .map(|lesson| lesson.id().clone())
}

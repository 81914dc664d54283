//! Completion store: the persistence collaborator boundary.
//!
//! The engine only ever *reads* through `CompletionStore`; writes
//! (`record_attempt`) belong to the handler layer. `MemoryStore` keeps
//! everything in in-memory maps behind an `RwLock`, which is enough for a
//! single-process deployment and for tests; a database-backed store would
//! implement the same trait.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{ExerciseCategory, ExerciseCompletion, UserProgress};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("completion store unavailable: {0}")]
    Unavailable(String),
}

/// One submitted attempt, as reported by the calling layer.
#[derive(Clone, Debug)]
pub struct AttemptRecord {
    pub user_id: String,
    pub exercise_id: String,
    pub category: ExerciseCategory,
    pub completed: bool,
    /// Score achieved on this attempt, 0-100.
    pub points: u32,
    /// Seconds spent on this attempt.
    pub time_spent: u64,
    pub first_try_success: bool,
    pub hints_used: u32,
}

/// Result of recording an attempt. `progress` is populated only when this
/// attempt completed the exercise for the first time.
#[derive(Clone, Debug)]
pub struct AttemptOutcome {
    pub completion: ExerciseCompletion,
    pub progress: Option<UserProgress>,
}

pub trait CompletionStore: Send + Sync {
    /// All completion records of one user, in a stable order.
    fn find_completions(&self, user_id: &str) -> Result<Vec<ExerciseCompletion>, StoreError>;

    fn find_completion(
        &self,
        user_id: &str,
        exercise_id: &str,
    ) -> Result<Option<ExerciseCompletion>, StoreError>;

    fn user_progress(&self, user_id: &str) -> Result<Option<UserProgress>, StoreError>;

    /// Upsert an attempt: counters increment, `best_score` max-aggregates,
    /// `completed` is sticky, and aggregate progress moves only on the
    /// first not-completed → completed transition.
    fn record_attempt(&self, attempt: &AttemptRecord) -> Result<AttemptOutcome, StoreError>;
}

#[derive(Default)]
struct Inner {
    /// Keyed by (user_id, exercise_id).
    completions: HashMap<(String, String), ExerciseCompletion>,
    progress: HashMap<String, UserProgress>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompletionStore for MemoryStore {
    #[instrument(level = "debug", skip(self))]
    fn find_completions(&self, user_id: &str) -> Result<Vec<ExerciseCompletion>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let mut list: Vec<ExerciseCompletion> = inner
            .completions
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        // Natural order: most recent attempt first, then id for determinism.
        list.sort_by(|a, b| {
            b.last_attempt_at
                .cmp(&a.last_attempt_at)
                .then_with(|| a.exercise_id.cmp(&b.exercise_id))
        });
        Ok(list)
    }

    fn find_completion(
        &self,
        user_id: &str,
        exercise_id: &str,
    ) -> Result<Option<ExerciseCompletion>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(inner
            .completions
            .get(&(user_id.to_string(), exercise_id.to_string()))
            .cloned())
    }

    fn user_progress(&self, user_id: &str) -> Result<Option<UserProgress>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(inner.progress.get(user_id).cloned())
    }

    #[instrument(level = "debug", skip(self, attempt), fields(user = %attempt.user_id, exercise = %attempt.exercise_id))]
    fn record_attempt(&self, attempt: &AttemptRecord) -> Result<AttemptOutcome, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let now = Utc::now();
        let key = (attempt.user_id.clone(), attempt.exercise_id.clone());

        let completion = inner.completions.entry(key).or_insert_with(|| {
            ExerciseCompletion {
                user_id: attempt.user_id.clone(),
                exercise_id: attempt.exercise_id.clone(),
                completed: false,
                completed_at: None,
                attempts: 0,
                best_score: 0,
                time_spent: 0,
                first_try_success: false,
                hints_used: 0,
                last_attempt_at: now,
            }
        });

        completion.attempts += 1;
        completion.time_spent += attempt.time_spent;
        completion.hints_used += attempt.hints_used;
        completion.best_score = completion.best_score.max(attempt.points);
        completion.last_attempt_at = now;
        // Set once, never unset.
        completion.first_try_success |= attempt.first_try_success;

        let newly_completed = attempt.completed && completion.completed_at.is_none();
        if attempt.completed {
            completion.completed = true;
            if completion.completed_at.is_none() {
                completion.completed_at = Some(now);
            }
        }
        let completion = completion.clone();

        let progress = if newly_completed {
            let progress = inner
                .progress
                .entry(attempt.user_id.clone())
                .or_insert_with(|| UserProgress::new(&attempt.user_id));
            progress.total_exercises_completed += 1;
            progress.add_xp(attempt.category, attempt.points);
            progress.total_time_spent += attempt.time_spent / 60;
            debug!(target: "progression", user = %attempt.user_id, total = progress.total_exercises_completed, "Progress updated");
            Some(progress.clone())
        } else {
            None
        };

        Ok(AttemptOutcome {
            completion,
            progress,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(completed: bool, points: u32) -> AttemptRecord {
        AttemptRecord {
            user_id: "u1".into(),
            exercise_id: "c-day01-ex00-hello".into(),
            category: ExerciseCategory::C,
            completed,
            points,
            time_spent: 120,
            first_try_success: false,
            hints_used: 1,
        }
    }

    #[test]
    fn first_attempt_creates_record() {
        let store = MemoryStore::new();
        let out = store.record_attempt(&attempt(false, 40)).unwrap();
        assert_eq!(out.completion.attempts, 1);
        assert_eq!(out.completion.best_score, 40);
        assert_eq!(out.completion.time_spent, 120);
        assert_eq!(out.completion.hints_used, 1);
        assert!(!out.completion.completed);
        assert!(out.completion.completed_at.is_none());
        assert!(out.progress.is_none());
    }

    #[test]
    fn aggregates_across_attempts() {
        let store = MemoryStore::new();
        store.record_attempt(&attempt(false, 70)).unwrap();
        let out = store.record_attempt(&attempt(false, 30)).unwrap();
        assert_eq!(out.completion.attempts, 2);
        // best_score is a max, not last-written.
        assert_eq!(out.completion.best_score, 70);
        assert_eq!(out.completion.time_spent, 240);
        assert_eq!(out.completion.hints_used, 2);
    }

    #[test]
    fn progress_moves_only_on_first_completion() {
        let store = MemoryStore::new();
        store.record_attempt(&attempt(false, 50)).unwrap();

        let out = store.record_attempt(&attempt(true, 100)).unwrap();
        let progress = out.progress.expect("first completion updates progress");
        assert_eq!(progress.total_exercises_completed, 1);
        assert_eq!(progress.c_xp, 100);
        assert_eq!(progress.total_time_spent, 2);
        let completed_at = out.completion.completed_at.expect("timestamp set");

        // Re-submitting a success must not double count or move the stamp.
        let again = store.record_attempt(&attempt(true, 100)).unwrap();
        assert!(again.progress.is_none());
        assert_eq!(again.completion.completed_at, Some(completed_at));
        assert_eq!(
            store.user_progress("u1").unwrap().unwrap().total_exercises_completed,
            1
        );
    }

    #[test]
    fn completed_flag_is_sticky() {
        let store = MemoryStore::new();
        store.record_attempt(&attempt(true, 100)).unwrap();
        let out = store.record_attempt(&attempt(false, 10)).unwrap();
        assert!(out.completion.completed, "a later failed attempt cannot un-complete");
    }

    #[test]
    fn first_try_success_never_unset() {
        let store = MemoryStore::new();
        let mut a = attempt(true, 100);
        a.first_try_success = true;
        store.record_attempt(&a).unwrap();

        let out = store.record_attempt(&attempt(false, 0)).unwrap();
        assert!(out.completion.first_try_success);
    }

    #[test]
    fn completions_scoped_per_user() {
        let store = MemoryStore::new();
        store.record_attempt(&attempt(false, 10)).unwrap();
        let mut other = attempt(false, 10);
        other.user_id = "u2".into();
        other.exercise_id = "c-day02-ex00-conditions".into();
        store.record_attempt(&other).unwrap();

        let u1 = store.find_completions("u1").unwrap();
        assert_eq!(u1.len(), 1);
        assert_eq!(u1[0].exercise_id, "c-day01-ex00-hello");
        assert_eq!(store.find_completions("u2").unwrap().len(), 1);
        assert!(store.find_completions("nobody").unwrap().is_empty());
        assert!(store
            .find_completion("u1", "c-day01-ex00-hello")
            .unwrap()
            .is_some());
    }
}

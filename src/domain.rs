//! Domain models used by the backend: concepts, exercises, completions,
//! and aggregate user progress.
//!
//! Concepts and exercise summaries are static catalog data, loaded once at
//! startup and never mutated. Completion and progress records are owned by
//! the completion store and passed into the engine by value per call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category a concept belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConceptCategory {
    C,
    Terminal,
    Git,
    Debug,
}

/// Micro self-test attached to a concept (2-3 minute prompt).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuickReview {
    pub question: String,
    pub hint: String,
    pub answer: String,
}

/// An atomic teachable unit, tagged with the program day it is first seen.
/// Defined once at catalog build time; immutable for the process lifetime.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub id: String,
    pub name: String,
    pub category: ConceptCategory,
    /// 1-based program day on which the learner first meets this concept.
    pub introduced_on_day: u32,
    pub short_description: String,
    pub key_points: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_review: Option<QuickReview>,
}

/// Category an exercise belongs to (no debug track for exercises).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseCategory {
    C,
    Terminal,
    Git,
}

/// Exercise metadata summary served to the UI and fed to the recommender.
/// The statement/test content itself lives with the frontend assets.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub category: ExerciseCategory,
    pub day: u32,
    /// 0-based position within the day's category track.
    pub order: usize,
    pub title: String,
    /// 1 (easiest) to 5 (hardest).
    pub difficulty: u8,
    pub points: u32,
    /// Estimated time in minutes.
    pub estimated_time: u32,
}

/// Per (user, exercise) record of attempts. Created on the first attempt,
/// updated on every subsequent one, never deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseCompletion {
    pub user_id: String,
    pub exercise_id: String,
    /// Sticky: once an attempt succeeds this stays true.
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub attempts: u32,
    /// Max-aggregated across attempts, 0-100.
    pub best_score: u32,
    /// Cumulative seconds across attempts.
    pub time_spent: u64,
    /// Set once if the very first attempt succeeded; never unset.
    pub first_try_success: bool,
    pub hints_used: u32,
    pub last_attempt_at: DateTime<Utc>,
}

/// Aggregate progress, one record per user. Updated only when a completion
/// transitions to completed for the first time.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub user_id: String,
    pub total_exercises_completed: u32,
    pub c_xp: u32,
    pub terminal_xp: u32,
    pub git_xp: u32,
    /// Minutes, aggregated from completed exercises.
    pub total_time_spent: u64,
}

impl UserProgress {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            ..Self::default()
        }
    }

    /// Credit XP on the track matching the exercise category.
    pub fn add_xp(&mut self, category: ExerciseCategory, points: u32) {
        match category {
            ExerciseCategory::C => self.c_xp += points,
            ExerciseCategory::Terminal => self.terminal_xp += points,
            ExerciseCategory::Git => self.git_xp += points,
        }
    }
}

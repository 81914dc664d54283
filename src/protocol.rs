//! Public request/response structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::config::Phase;
use crate::domain::{ConceptCategory, Exercise, ExerciseCompletion, UserProgress};
use crate::recommend::Recommendation;
use crate::spaced_repetition::{Review, ReviewStats};
use crate::unlock::{UnlockPolicy, UnlockStatus};

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub day: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramOut {
    pub total_days: u32,
    pub group_size: usize,
    pub unlock_policy: UnlockPolicy,
    pub phase: Phase,
    pub progress_percent: u32,
}

#[derive(Debug, Deserialize)]
pub struct ConceptQuery {
    pub category: Option<ConceptCategory>,
    pub day: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsOut {
    pub day: u32,
    pub count: usize,
    pub reviews: Vec<Review>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStatsOut {
    pub day: u32,
    pub stats: ReviewStats,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayExercisesOut {
    pub day: u32,
    pub exercises: Vec<Exercise>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

pub fn default_user_id() -> String {
    "default-user".into()
}

/// Unlock status for one exercise of a day, joined with its id.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseUnlockOut {
    pub exercise_id: String,
    #[serde(flatten)]
    pub status: UnlockStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayUnlockOut {
    pub day: u32,
    pub next_group_to_unlock: Option<usize>,
    pub statuses: Vec<ExerciseUnlockOut>,
}

/// Explicit unlock evaluation over raw counts/indices.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockIn {
    pub total_exercises: i64,
    #[serde(default)]
    pub completed: Vec<i64>,
}

#[derive(Serialize)]
pub struct UnlockOut {
    pub statuses: Vec<UnlockStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendQuery {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct RecommendOut {
    pub success: bool,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitIn {
    pub user_id: String,
    pub exercise_id: String,
    pub completed: bool,
    #[serde(default)]
    pub points: u32,
    /// Seconds spent on this attempt.
    #[serde(default)]
    pub time_spent: u64,
    #[serde(default)]
    pub first_try_success: bool,
    #[serde(default)]
    pub hints_used: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOut {
    pub success: bool,
    pub message: String,
    pub completion: ExerciseCompletion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_progress: Option<UserProgress>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOut {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<UserProgress>,
    pub completions: Vec<ExerciseCompletion>,
}

//! Exercise recommendations based on the user's completion history.
//!
//! Strategy, in priority order:
//! - *revise*: attempted but not perfect (not completed, or best score < 100)
//! - *new*: never attempted
//! - *practice*: everything else, to fill up to the limit

use serde::Serialize;

use crate::domain::{Exercise, ExerciseCompletion};
use crate::error::ApiError;
use crate::store::CompletionStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationReason {
    Revise,
    New,
    Practice,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub exercise_id: String,
    /// Absent when a completion record references an exercise that has
    /// since left the catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub reason: RecommendationReason,
    pub points: u32,
}

/// Ranked exercise suggestions for a user, at most `limit` items.
///
/// Read-only against the store; a store failure surfaces as
/// `RecommendationUnavailable` rather than a partial list.
pub fn recommendations_for_user(
    store: &dyn CompletionStore,
    exercises: &[Exercise],
    user_id: &str,
    limit: usize,
) -> Result<Vec<Recommendation>, ApiError> {
    let completions = store
        .find_completions(user_id)
        .map_err(|e| ApiError::RecommendationUnavailable(e.to_string()))?;

    let mut recommendations: Vec<Recommendation> = Vec::new();

    // 1) Revise: attempted but not perfect, in store order.
    for c in completions.iter().filter(|c| needs_revision(c)) {
        if recommendations.len() >= limit {
            break;
        }
        let meta = exercises.iter().find(|e| e.id == c.exercise_id);
        recommendations.push(Recommendation {
            exercise_id: c.exercise_id.clone(),
            title: meta.map(|m| m.title.clone()),
            reason: RecommendationReason::Revise,
            points: c.best_score,
        });
    }

    // 2) New: never attempted at all.
    let attempted: std::collections::HashSet<&str> =
        completions.iter().map(|c| c.exercise_id.as_str()).collect();
    for e in exercises.iter().filter(|e| !attempted.contains(e.id.as_str())) {
        if recommendations.len() >= limit {
            break;
        }
        recommendations.push(Recommendation {
            exercise_id: e.id.clone(),
            title: Some(e.title.clone()),
            reason: RecommendationReason::New,
            points: e.points,
        });
    }

    // 3) Practice: whatever is left in the catalog.
    for e in exercises {
        if recommendations.len() >= limit {
            break;
        }
        if !recommendations.iter().any(|r| r.exercise_id == e.id) {
            recommendations.push(Recommendation {
                exercise_id: e.id.clone(),
                title: Some(e.title.clone()),
                reason: RecommendationReason::Practice,
                points: e.points,
            });
        }
    }

    recommendations.truncate(limit);
    Ok(recommendations)
}

fn needs_revision(c: &ExerciseCompletion) -> bool {
    !c.completed || c.best_score < 100
}

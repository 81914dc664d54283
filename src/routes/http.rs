//! HTTP endpoint handlers. These are thin wrappers that forward to the
//! progression engine; each handler is instrumented and logs basic result
//! info. The current day is always an explicit request parameter — handlers
//! never read ambient "current day" state.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use tracing::{info, instrument};

use crate::config::{current_phase, progress_percent};
use crate::domain::Concept;
use crate::error::ApiError;
use crate::protocol::*;
use crate::recommend::recommendations_for_user;
use crate::spaced_repetition::{review_stats, reviews_for_day};
use crate::state::AppState;
use crate::store::{AttemptRecord, CompletionStore};
use crate::unlock::{
    calculate_unlock_status, next_group_to_unlock, try_unlock_status, GROUP_SIZE,
};

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
    Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state), fields(day = q.day))]
pub async fn http_get_program(
    State(state): State<Arc<AppState>>,
    Query(q): Query<DayQuery>,
) -> impl IntoResponse {
    let program = &state.program;
    Json(ProgramOut {
        total_days: program.total_days,
        group_size: GROUP_SIZE,
        unlock_policy: program.unlock_policy,
        phase: current_phase(q.day),
        progress_percent: progress_percent(q.day, program.total_days),
    })
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_concepts(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ConceptQuery>,
) -> impl IntoResponse {
    let concepts: Vec<&Concept> = state
        .catalog
        .all()
        .iter()
        .filter(|c| q.category.map_or(true, |cat| c.category == cat))
        .filter(|c| q.day.map_or(true, |d| c.introduced_on_day == d))
        .collect();
    info!(target: "progression", count = concepts.len(), "Concepts listed");
    Json(concepts.into_iter().cloned().collect::<Vec<Concept>>())
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_concept(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Concept>, ApiError> {
    state
        .catalog
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("unknown concept: {id}")))
}

#[instrument(level = "info", skip(state), fields(day = q.day))]
pub async fn http_get_reviews(
    State(state): State<Arc<AppState>>,
    Query(q): Query<DayQuery>,
) -> impl IntoResponse {
    let reviews = reviews_for_day(&state.catalog, q.day);
    info!(target: "progression", day = q.day, count = reviews.len(), "Reviews computed");
    Json(ReviewsOut {
        day: q.day,
        count: reviews.len(),
        reviews,
    })
}

#[instrument(level = "info", skip(state), fields(day = q.day))]
pub async fn http_get_review_stats(
    State(state): State<Arc<AppState>>,
    Query(q): Query<DayQuery>,
) -> impl IntoResponse {
    let stats = review_stats(&state.catalog, q.day);
    Json(ReviewStatsOut { day: q.day, stats })
}

#[instrument(level = "info", skip(state), fields(%day))]
pub async fn http_get_day_exercises(
    State(state): State<Arc<AppState>>,
    Path(day): Path<u32>,
) -> Result<Json<DayExercisesOut>, ApiError> {
    check_day_bounds(&state, day)?;
    let exercises: Vec<_> = state.exercises.by_day(day).into_iter().cloned().collect();
    Ok(Json(DayExercisesOut {
        day,
        count: exercises.len(),
        exercises,
    }))
}

#[instrument(level = "info", skip(state), fields(%day, user = %q.user_id))]
pub async fn http_get_day_unlock(
    State(state): State<Arc<AppState>>,
    Path(day): Path<u32>,
    Query(q): Query<UserQuery>,
) -> Result<Json<DayUnlockOut>, ApiError> {
    check_day_bounds(&state, day)?;
    let day_exercises = state.exercises.by_day(day);

    let completions = state
        .store
        .find_completions(&q.user_id)
        .map_err(|e| ApiError::StoreUnavailable(e.to_string()))?;

    // Completed in-day positions for this user. Positions are indices into
    // the day list, not the per-category `order` field.
    let completed: BTreeSet<usize> = day_exercises
        .iter()
        .enumerate()
        .filter(|(_, e)| {
            completions
                .iter()
                .any(|c| c.completed && c.exercise_id == e.id)
        })
        .map(|(i, _)| i)
        .collect();

    let policy = state.program.unlock_policy;
    let statuses = calculate_unlock_status(policy, day_exercises.len(), &completed);
    let statuses = statuses
        .into_iter()
        .zip(day_exercises.iter())
        .map(|(status, exercise)| ExerciseUnlockOut {
            exercise_id: exercise.id.clone(),
            status,
        })
        .collect();

    info!(target: "progression", %day, user = %q.user_id, completed = completed.len(), "Day unlock computed");
    Ok(Json(DayUnlockOut {
        day,
        next_group_to_unlock: next_group_to_unlock(policy, day_exercises.len(), &completed),
        statuses,
    }))
}

#[instrument(level = "info", skip(state, body), fields(total = body.total_exercises, completed = body.completed.len()))]
pub async fn http_post_unlock(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UnlockIn>,
) -> Result<Json<UnlockOut>, ApiError> {
    let statuses = try_unlock_status(
        state.program.unlock_policy,
        body.total_exercises,
        &body.completed,
    )?;
    Ok(Json(UnlockOut { statuses }))
}

#[instrument(level = "info", skip(state), fields(user = %q.user_id))]
pub async fn http_get_recommendations(
    State(state): State<Arc<AppState>>,
    Query(q): Query<RecommendQuery>,
) -> Result<Json<RecommendOut>, ApiError> {
    let limit = q.limit.unwrap_or(state.program.recommend_limit);
    let recommendations =
        recommendations_for_user(&state.store, state.exercises.all(), &q.user_id, limit)?;
    info!(target: "progression", user = %q.user_id, count = recommendations.len(), "Recommendations served");
    Ok(Json(RecommendOut {
        success: true,
        recommendations,
    }))
}

#[instrument(level = "info", skip(state, body), fields(user = %body.user_id, exercise = %body.exercise_id, completed = body.completed))]
pub async fn http_post_submit(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubmitIn>,
) -> Result<Json<SubmitOut>, ApiError> {
    if body.user_id.is_empty() || body.exercise_id.is_empty() {
        return Err(ApiError::InvalidInput(
            "userId and exerciseId are required".into(),
        ));
    }
    let exercise = state
        .exercises
        .get(&body.exercise_id)
        .ok_or_else(|| ApiError::NotFound(format!("unknown exercise: {}", body.exercise_id)))?;

    let outcome = state
        .store
        .record_attempt(&AttemptRecord {
            user_id: body.user_id.clone(),
            exercise_id: body.exercise_id.clone(),
            category: exercise.category,
            completed: body.completed,
            points: body.points,
            time_spent: body.time_spent,
            first_try_success: body.first_try_success,
            hints_used: body.hints_used,
        })
        .map_err(|e| ApiError::StoreUnavailable(e.to_string()))?;

    let newly_completed = outcome.progress.is_some();
    info!(
        target: "progression",
        user = %body.user_id,
        exercise = %body.exercise_id,
        attempts = outcome.completion.attempts,
        newly_completed,
        "Attempt recorded"
    );
    Ok(Json(SubmitOut {
        success: true,
        message: if newly_completed {
            "Progression enregistrée avec succès".into()
        } else {
            "Tentative enregistrée".into()
        },
        completion: outcome.completion,
        user_progress: outcome.progress,
    }))
}

#[instrument(level = "info", skip(state), fields(user = %q.user_id))]
pub async fn http_get_progress(
    State(state): State<Arc<AppState>>,
    Query(q): Query<UserQuery>,
) -> Result<Json<ProgressOut>, ApiError> {
    let progress = state
        .store
        .user_progress(&q.user_id)
        .map_err(|e| ApiError::StoreUnavailable(e.to_string()))?;
    let completions = state
        .store
        .find_completions(&q.user_id)
        .map_err(|e| ApiError::StoreUnavailable(e.to_string()))?;
    Ok(Json(ProgressOut {
        user_id: q.user_id,
        progress,
        completions,
    }))
}

fn check_day_bounds(state: &AppState, day: u32) -> Result<(), ApiError> {
    let total = state.program.total_days;
    if day < 1 || day > total {
        return Err(ApiError::InvalidInput(format!(
            "invalid day number: must be between 1 and {total}"
        )));
    }
    Ok(())
}

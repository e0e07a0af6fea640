use axum::Json;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::attempt::{AttemptResultResponse, AttemptSubmit, QuizAttemptResponse};
use crate::services::scoring;
use crate::services::view_cache;

pub(in crate::api) async fn submit_attempt(
    axum::extract::Path(quiz_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
    Json(payload): Json<AttemptSubmit>,
) -> Result<(axum::http::StatusCode, Json<AttemptResultResponse>), ApiError> {
    let quiz = repositories::quizzes::find_with_course(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))?;

    let enrollment =
        repositories::enrollments::find_for_user_course(state.db(), &user.id, &quiz.course_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check enrollment"))?;

    if enrollment.is_none() {
        return Err(ApiError::Forbidden("You are not enrolled in this course"));
    }

    let questions = repositories::questions::list_by_quiz(state.db(), &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list questions"))?;

    let summary = scoring::score_answers(&questions, &payload.answers)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    // Attempts are history, not an upsert: every graded submission gets its
    // own row, score 0 included.
    let attempt = repositories::quiz_attempts::create(
        state.db(),
        repositories::quiz_attempts::CreateQuizAttempt {
            id: &Uuid::new_v4().to_string(),
            user_id: &user.id,
            quiz_id: &quiz.id,
            score: summary.score,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to store quiz attempt"))?;

    view_cache::invalidate(state.redis(), &[view_cache::student_courses(&user.id)]).await;

    tracing::info!(
        user_id = %user.id,
        quiz_id = %quiz.id,
        score = summary.score,
        action = "attempt_submit",
        "Student submitted quiz attempt"
    );

    Ok((
        axum::http::StatusCode::CREATED,
        Json(AttemptResultResponse {
            score: summary.score,
            correct_count: summary.correct_count,
            total_questions: summary.total_questions,
            attempt: QuizAttemptResponse::from_db(attempt),
        }),
    ))
}

pub(in crate::api) async fn list_attempts(
    axum::extract::Path(quiz_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<QuizAttemptResponse>>, ApiError> {
    let attempts = repositories::quiz_attempts::list_for_user_quiz(state.db(), &user.id, &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list quiz attempts"))?;

    Ok(Json(attempts.into_iter().map(QuizAttemptResponse::from_db).collect()))
}

#[cfg(test)]
mod tests;

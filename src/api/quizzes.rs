use axum::{Json, Router};
use uuid::Uuid;

use crate::api::attempts;
use crate::api::errors::{is_unique_violation, ApiError};
use crate::api::guards::CurrentInstructor;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::content::{QuestionCreate, QuestionResponse, QuizCreate, QuizResponse};
use crate::services::view_cache;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:quiz_id", axum::routing::delete(delete_quiz))
        .route("/:quiz_id/questions", axum::routing::post(create_question))
        .route(
            "/:quiz_id/attempts",
            axum::routing::post(attempts::submit_attempt).get(attempts::list_attempts),
        )
}

pub(crate) fn questions_router() -> Router<AppState> {
    Router::new().route("/:question_id", axum::routing::delete(delete_question))
}

pub(in crate::api) async fn create_quiz(
    axum::extract::Path(lesson_id): axum::extract::Path<String>,
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
    Json(payload): Json<QuizCreate>,
) -> Result<(axum::http::StatusCode, Json<QuizResponse>), ApiError> {
    let lesson = repositories::lessons::find_owned(state.db(), &lesson_id, &instructor.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lesson"))?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("Quiz title must not be empty".to_string()));
    }

    let now = primitive_now_utc();
    let quiz = repositories::quizzes::create(
        state.db(),
        repositories::quizzes::CreateQuiz {
            id: &Uuid::new_v4().to_string(),
            title,
            lesson_id: &lesson.id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| {
        // One quiz per lesson; the UNIQUE(lesson_id) constraint is the guard.
        if is_unique_violation(&e) {
            ApiError::Conflict("Lesson already has a quiz".to_string())
        } else {
            ApiError::internal(e, "Failed to create quiz")
        }
    })?;

    view_cache::invalidate(state.redis(), &[view_cache::course_edit(&lesson.course_id)]).await;

    Ok((axum::http::StatusCode::CREATED, Json(QuizResponse::from_db(quiz))))
}

async fn delete_quiz(
    axum::extract::Path(quiz_id): axum::extract::Path<String>,
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    let quiz = repositories::quizzes::find_owned(state.db(), &quiz_id, &instructor.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))?;

    repositories::quizzes::delete(state.db(), &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete quiz"))?;

    view_cache::invalidate(state.redis(), &[view_cache::course_edit(&quiz.course_id)]).await;

    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn create_question(
    axum::extract::Path(quiz_id): axum::extract::Path<String>,
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
    Json(payload): Json<QuestionCreate>,
) -> Result<(axum::http::StatusCode, Json<QuestionResponse>), ApiError> {
    let quiz = repositories::quizzes::find_owned(state.db(), &quiz_id, &instructor.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))?;

    let text = payload.text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("Question text must not be empty".to_string()));
    }
    if payload.options.len() < 2 {
        return Err(ApiError::BadRequest("Options must contain at least 2 items".to_string()));
    }
    if payload.correct_answer < 0 || payload.correct_answer as usize >= payload.options.len() {
        return Err(ApiError::BadRequest("Correct answer index is out of range".to_string()));
    }

    let question = repositories::questions::create(
        state.db(),
        repositories::questions::CreateQuestion {
            id: &Uuid::new_v4().to_string(),
            text,
            options: &payload.options,
            correct_answer: payload.correct_answer,
            quiz_id: &quiz.id,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create question"))?;

    view_cache::invalidate(state.redis(), &[view_cache::course_edit(&quiz.course_id)]).await;

    Ok((axum::http::StatusCode::CREATED, Json(QuestionResponse::from_db(question))))
}

async fn delete_question(
    axum::extract::Path(question_id): axum::extract::Path<String>,
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    let question = repositories::questions::find_owned(state.db(), &question_id, &instructor.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch question"))?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    repositories::questions::delete(state.db(), &question.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete question"))?;

    view_cache::invalidate(state.redis(), &[view_cache::course_edit(&question.course_id)]).await;

    Ok(axum::http::StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests;

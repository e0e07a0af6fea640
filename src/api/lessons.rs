use axum::{Json, Router};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentInstructor;
use crate::api::quizzes;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::content::{LessonCreate, LessonResponse, LessonUpdate};
use crate::services::view_cache;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:lesson_id", axum::routing::patch(update_lesson).delete(delete_lesson))
        .route("/:lesson_id/quiz", axum::routing::post(quizzes::create_quiz))
}

pub(in crate::api) async fn create_lesson(
    axum::extract::Path(module_id): axum::extract::Path<String>,
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
    Json(payload): Json<LessonCreate>,
) -> Result<(axum::http::StatusCode, Json<LessonResponse>), ApiError> {
    let module = repositories::modules::find_owned(state.db(), &module_id, &instructor.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch module"))?
        .ok_or_else(|| ApiError::NotFound("Module not found".to_string()))?;

    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("Lesson title must not be empty".to_string()));
    }

    let now = primitive_now_utc();
    let lesson = repositories::lessons::create(
        state.db(),
        repositories::lessons::CreateLesson {
            id: &Uuid::new_v4().to_string(),
            title,
            content: payload.content.as_deref().unwrap_or(""),
            position: payload.order.unwrap_or(0),
            module_id: &module.id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create lesson"))?;

    view_cache::invalidate(state.redis(), &[view_cache::course_edit(&module.course_id)]).await;

    Ok((axum::http::StatusCode::CREATED, Json(LessonResponse::from_db(lesson))))
}

async fn update_lesson(
    axum::extract::Path(lesson_id): axum::extract::Path<String>,
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
    Json(payload): Json<LessonUpdate>,
) -> Result<Json<LessonResponse>, ApiError> {
    let lesson = repositories::lessons::find_owned(state.db(), &lesson_id, &instructor.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lesson"))?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    // Markdown content may legitimately be set to the empty string; only an
    // omitted field leaves it unchanged.
    let title = payload
        .title
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string);

    repositories::lessons::update(
        state.db(),
        &lesson.id,
        repositories::lessons::UpdateLesson {
            title,
            content: payload.content,
            position: payload.order,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update lesson"))?;

    let updated = repositories::lessons::fetch_one_by_id(state.db(), &lesson.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated lesson"))?;

    view_cache::invalidate(state.redis(), &[view_cache::course_edit(&lesson.course_id)]).await;

    Ok(Json(LessonResponse::from_db(updated)))
}

async fn delete_lesson(
    axum::extract::Path(lesson_id): axum::extract::Path<String>,
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    let lesson = repositories::lessons::find_owned(state.db(), &lesson_id, &instructor.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lesson"))?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    repositories::lessons::delete(state.db(), &lesson.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete lesson"))?;

    view_cache::invalidate(state.redis(), &[view_cache::course_edit(&lesson.course_id)]).await;

    Ok(axum::http::StatusCode::NO_CONTENT)
}

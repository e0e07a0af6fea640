use axum::{Json, Router};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentInstructor;
use crate::api::lessons;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::content::{ModuleCreate, ModuleResponse, ModuleUpdate};
use crate::services::view_cache;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:module_id", axum::routing::patch(update_module).delete(delete_module))
        .route("/:module_id/lessons", axum::routing::post(lessons::create_lesson))
}

pub(in crate::api) async fn create_module(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
    Json(payload): Json<ModuleCreate>,
) -> Result<(axum::http::StatusCode, Json<ModuleResponse>), ApiError> {
    let course = repositories::courses::find_owned(state.db(), &course_id, &instructor.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("Module title must not be empty".to_string()));
    }

    let now = primitive_now_utc();
    let module = repositories::modules::create(
        state.db(),
        repositories::modules::CreateModule {
            id: &Uuid::new_v4().to_string(),
            title,
            position: payload.order.unwrap_or(0),
            course_id: &course.id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create module"))?;

    view_cache::invalidate(state.redis(), &[view_cache::course_edit(&course.id)]).await;

    Ok((axum::http::StatusCode::CREATED, Json(ModuleResponse::from_db(module))))
}

async fn update_module(
    axum::extract::Path(module_id): axum::extract::Path<String>,
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
    Json(payload): Json<ModuleUpdate>,
) -> Result<Json<ModuleResponse>, ApiError> {
    let module = repositories::modules::find_owned(state.db(), &module_id, &instructor.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch module"))?
        .ok_or_else(|| ApiError::NotFound("Module not found".to_string()))?;

    // Blank titles and unparseable order values read as absent, leaving the
    // stored fields unchanged.
    let title = payload
        .title
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string);

    repositories::modules::update(
        state.db(),
        &module.id,
        repositories::modules::UpdateModule {
            title,
            position: payload.order,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update module"))?;

    let updated = repositories::modules::fetch_one_by_id(state.db(), &module.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated module"))?;

    view_cache::invalidate(state.redis(), &[view_cache::course_edit(&module.course_id)]).await;

    Ok(Json(ModuleResponse::from_db(updated)))
}

async fn delete_module(
    axum::extract::Path(module_id): axum::extract::Path<String>,
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    let module = repositories::modules::find_owned(state.db(), &module_id, &instructor.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch module"))?
        .ok_or_else(|| ApiError::NotFound("Module not found".to_string()))?;

    repositories::modules::delete(state.db(), &module.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete module"))?;

    view_cache::invalidate(state.redis(), &[view_cache::course_edit(&module.course_id)]).await;

    tracing::info!(
        instructor_id = %instructor.id,
        module_id = %module.id,
        course_id = %module.course_id,
        action = "module_delete",
        "Instructor deleted module"
    );

    Ok(axum::http::StatusCode::NO_CONTENT)
}

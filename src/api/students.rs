use axum::{routing::get, Json, Router};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::{is_unique_violation, ApiError};
use crate::api::guards::CurrentInstructor;
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::user::{StudentCreate, StudentResponse, StudentUpdate, UserResponse};
use crate::services::view_cache;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route("/:student_id", axum::routing::patch(update_student).delete(delete_student))
}

async fn list_students(
    CurrentInstructor(_instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<StudentResponse>>, ApiError> {
    let students = repositories::users::list_students_with_counts(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list students"))?;

    Ok(Json(students.into_iter().map(StudentResponse::from_row).collect()))
}

async fn create_student(
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
    Json(payload): Json<StudentCreate>,
) -> Result<(axum::http::StatusCode, Json<UserResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let email = payload.email.trim().to_ascii_lowercase();

    // Uniqueness is cross-role: a student may not take an instructor's email.
    let existing = repositories::users::exists_by_email(state.db(), &email, None)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check existing user"))?;

    if existing.is_some() {
        return Err(ApiError::Conflict("A user with this email already exists".to_string()));
    }

    let hashed_password = security::hash_password(&payload.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let now = primitive_now_utc();
    let student = repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            id: &Uuid::new_v4().to_string(),
            full_name: payload.full_name.trim(),
            email: &email,
            hashed_password,
            role: UserRole::Student,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("A user with this email already exists".to_string())
        } else {
            ApiError::internal(e, "Failed to create student")
        }
    })?;

    view_cache::invalidate(state.redis(), &[view_cache::STUDENTS.to_string()]).await;

    tracing::info!(
        instructor_id = %instructor.id,
        student_id = %student.id,
        action = "student_create",
        "Instructor created student"
    );

    Ok((axum::http::StatusCode::CREATED, Json(UserResponse::from_db(student))))
}

async fn update_student(
    axum::extract::Path(student_id): axum::extract::Path<String>,
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
    Json(payload): Json<StudentUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let student = repositories::users::find_student_by_id(state.db(), &student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch student"))?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    let email = payload.email.trim().to_ascii_lowercase();
    if email != student.email {
        let taken = repositories::users::exists_by_email(state.db(), &email, Some(&student.id))
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check existing user"))?;
        if taken.is_some() {
            return Err(ApiError::Conflict("A user with this email already exists".to_string()));
        }
    }

    // A blank password keeps the existing credential.
    let hashed_password = match payload.password.as_deref().map(str::trim) {
        Some(password) if !password.is_empty() => Some(
            security::hash_password(password)
                .map_err(|e| ApiError::internal(e, "Failed to hash password"))?,
        ),
        _ => None,
    };

    repositories::users::update_student(
        state.db(),
        &student.id,
        repositories::users::UpdateStudent {
            full_name: payload.full_name.trim().to_string(),
            email,
            hashed_password,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("A user with this email already exists".to_string())
        } else {
            ApiError::internal(e, "Failed to update student")
        }
    })?;

    let updated = repositories::users::fetch_one_by_id(state.db(), &student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated student"))?;

    view_cache::invalidate(state.redis(), &[view_cache::STUDENTS.to_string()]).await;

    tracing::info!(
        instructor_id = %instructor.id,
        student_id = %updated.id,
        action = "student_update",
        "Instructor updated student"
    );

    Ok(Json(UserResponse::from_db(updated)))
}

async fn delete_student(
    axum::extract::Path(student_id): axum::extract::Path<String>,
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    // Scoped to role = student; an instructor id through this path reads as
    // absent.
    let deleted = repositories::users::delete_student(state.db(), &student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete student"))?;

    if !deleted {
        return Err(ApiError::NotFound("Student not found".to_string()));
    }

    view_cache::invalidate(state.redis(), &[view_cache::STUDENTS.to_string()]).await;

    tracing::info!(
        instructor_id = %instructor.id,
        student_id = %student_id,
        action = "student_delete",
        "Instructor deleted student"
    );

    Ok(axum::http::StatusCode::NO_CONTENT)
}

use axum::{routing::get, Json, Router};
use uuid::Uuid;

use crate::api::errors::{is_unique_violation, ApiError};
use crate::api::guards::CurrentUser;
use crate::api::helpers;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::enrollment::{
    CatalogCourseResponse, CourseContentResponse, EnrolledCourseResponse, EnrollmentResponse,
    LessonContentResponse, ModuleContentResponse, QuizContentResponse, StudentQuestionResponse,
};
use crate::services::view_cache;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(list_catalog))
        .route("/enrollments", get(list_enrolled))
}

/// The catalog is visible to every authenticated user, with no ownership
/// filter.
async fn list_catalog(
    CurrentUser(_user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<CatalogCourseResponse>>, ApiError> {
    let rows = repositories::courses::list_catalog(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;

    Ok(Json(rows.into_iter().map(CatalogCourseResponse::from_row).collect()))
}

async fn list_enrolled(
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<EnrolledCourseResponse>>, ApiError> {
    let rows = repositories::enrollments::list_courses_for_user(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list enrollments"))?;

    Ok(Json(rows.into_iter().map(EnrolledCourseResponse::from_row).collect()))
}

pub(in crate::api) async fn enroll(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<(axum::http::StatusCode, Json<EnrollmentResponse>), ApiError> {
    let existing =
        repositories::enrollments::find_for_user_course(state.db(), &user.id, &course_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check enrollment"))?;

    if existing.is_some() {
        return Err(ApiError::Conflict("You are already enrolled in this course".to_string()));
    }

    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let enrollment = repositories::enrollments::create(
        state.db(),
        repositories::enrollments::CreateEnrollment {
            id: &Uuid::new_v4().to_string(),
            user_id: &user.id,
            course_id: &course.id,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| {
        // A concurrent enroll for the same (user, course) loses the race at
        // the unique constraint and reports the same conflict as the
        // pre-check.
        if is_unique_violation(&e) {
            ApiError::Conflict("You are already enrolled in this course".to_string())
        } else {
            ApiError::internal(e, "Failed to create enrollment")
        }
    })?;

    view_cache::invalidate(
        state.redis(),
        &[view_cache::student_courses(&user.id), view_cache::CATALOG.to_string()],
    )
    .await;

    tracing::info!(
        user_id = %user.id,
        course_id = %course.id,
        action = "enroll",
        "Student enrolled in course"
    );

    Ok((axum::http::StatusCode::CREATED, Json(EnrollmentResponse::from_db(enrollment))))
}

pub(in crate::api) async fn course_content(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    CurrentUser(user): CurrentUser,
    state: axum::extract::State<AppState>,
) -> Result<Json<CourseContentResponse>, ApiError> {
    let enrollment =
        repositories::enrollments::find_for_user_course(state.db(), &user.id, &course_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check enrollment"))?;

    if enrollment.is_none() {
        return Err(ApiError::Forbidden("You are not enrolled in this course"));
    }

    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let instructor = repositories::users::find_by_id(state.db(), &course.instructor_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch instructor"))?;
    let instructor_name = instructor.map(|user| user.full_name).unwrap_or_default();

    let tree = helpers::load_course_tree(state.db(), &course.id).await?;

    let modules = tree
        .into_iter()
        .map(|node| ModuleContentResponse {
            id: node.module.id,
            title: node.module.title,
            order: node.module.position,
            lessons: node
                .lessons
                .into_iter()
                .map(|lesson_node| LessonContentResponse {
                    id: lesson_node.lesson.id,
                    title: lesson_node.lesson.title,
                    content: lesson_node.lesson.content,
                    order: lesson_node.lesson.position,
                    quiz: lesson_node.quiz.map(|quiz_node| QuizContentResponse {
                        id: quiz_node.quiz.id,
                        title: quiz_node.quiz.title,
                        questions: quiz_node
                            .questions
                            .into_iter()
                            .map(StudentQuestionResponse::from_db)
                            .collect(),
                    }),
                })
                .collect(),
        })
        .collect();

    Ok(Json(CourseContentResponse {
        id: course.id,
        title: course.title,
        description: course.description,
        thumbnail_url: course.thumbnail_url,
        instructor_name,
        modules,
    }))
}

#[cfg(test)]
mod tests;

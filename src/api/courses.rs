use std::collections::HashMap;

use axum::{routing::get, Json, Router};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentInstructor;
use crate::api::helpers;
use crate::api::{enrollments, modules};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::content::{LessonResponse, QuestionResponse};
use crate::schemas::course::{
    CourseCreate, CourseEditResponse, CourseResponse, CourseSummaryResponse, CourseUpdate,
    LessonEditResponse, ModuleEditResponse, ModuleSummaryResponse, QuizEditResponse,
};
use crate::services::view_cache;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/:course_id", get(get_course).patch(update_course))
        .route("/:course_id/modules", axum::routing::post(modules::create_module))
        .route("/:course_id/enroll", axum::routing::post(enrollments::enroll))
        .route("/:course_id/content", get(enrollments::course_content))
}

/// Optional text inputs normalize to absent when blank after trimming; an
/// empty string is never stored.
fn normalize_optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}

async fn create_course(
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
    Json(payload): Json<CourseCreate>,
) -> Result<(axum::http::StatusCode, Json<CourseResponse>), ApiError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("Course title must not be empty".to_string()));
    }

    let now = primitive_now_utc();
    let course = repositories::courses::create(
        state.db(),
        repositories::courses::CreateCourse {
            id: &Uuid::new_v4().to_string(),
            title,
            description: normalize_optional(payload.description.as_deref()),
            thumbnail_url: normalize_optional(payload.thumbnail_url.as_deref()),
            instructor_id: &instructor.id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create course"))?;

    view_cache::invalidate(
        state.redis(),
        &[view_cache::instructor_courses(&instructor.id), view_cache::CATALOG.to_string()],
    )
    .await;

    tracing::info!(
        instructor_id = %instructor.id,
        course_id = %course.id,
        action = "course_create",
        "Instructor created course"
    );

    Ok((axum::http::StatusCode::CREATED, Json(CourseResponse::from_db(course))))
}

async fn list_courses(
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<CourseSummaryResponse>>, ApiError> {
    let courses = repositories::courses::list_for_instructor(state.db(), &instructor.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;

    let course_ids: Vec<String> = courses.iter().map(|course| course.id.clone()).collect();
    let mut modules_by_course =
        helpers::load_modules_with_lessons(state.db(), &course_ids).await?;

    let counts = if course_ids.is_empty() {
        Vec::new()
    } else {
        repositories::courses::enrollment_counts(state.db(), &course_ids)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to count enrollments"))?
    };
    let counts_by_course: HashMap<String, i64> =
        counts.into_iter().map(|row| (row.course_id, row.enrollment_count)).collect();

    let response = courses
        .into_iter()
        .map(|course| {
            let enrollment_count = counts_by_course.get(&course.id).copied().unwrap_or(0);
            let modules = modules_by_course
                .remove(&course.id)
                .unwrap_or_default()
                .into_iter()
                .map(|(module, lessons)| ModuleSummaryResponse {
                    id: module.id,
                    title: module.title,
                    order: module.position,
                    lessons: lessons.into_iter().map(LessonResponse::from_db).collect(),
                })
                .collect();

            CourseSummaryResponse {
                course: CourseResponse::from_db(course),
                enrollment_count,
                modules,
            }
        })
        .collect();

    Ok(Json(response))
}

async fn get_course(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
) -> Result<Json<CourseEditResponse>, ApiError> {
    let course = repositories::courses::find_owned(state.db(), &course_id, &instructor.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let tree = helpers::load_course_tree(state.db(), &course.id).await?;

    let modules = tree
        .into_iter()
        .map(|node| ModuleEditResponse {
            id: node.module.id,
            title: node.module.title,
            order: node.module.position,
            lessons: node
                .lessons
                .into_iter()
                .map(|lesson_node| LessonEditResponse {
                    id: lesson_node.lesson.id,
                    title: lesson_node.lesson.title,
                    content: lesson_node.lesson.content,
                    order: lesson_node.lesson.position,
                    quiz: lesson_node.quiz.map(|quiz_node| QuizEditResponse {
                        id: quiz_node.quiz.id,
                        title: quiz_node.quiz.title,
                        questions: quiz_node
                            .questions
                            .into_iter()
                            .map(QuestionResponse::from_db)
                            .collect(),
                    }),
                })
                .collect(),
        })
        .collect();

    Ok(Json(CourseEditResponse { course: CourseResponse::from_db(course), modules }))
}

async fn update_course(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
    Json(payload): Json<CourseUpdate>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = repositories::courses::find_owned(state.db(), &course_id, &instructor.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    // A blank title is skipped, not rejected; a blank description clears the
    // stored value.
    let title = payload
        .title
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string);
    let description = payload.description.map(|raw| {
        let trimmed = raw.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    });

    repositories::courses::update(
        state.db(),
        &course.id,
        repositories::courses::UpdateCourse {
            title,
            description,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update course"))?;

    let updated = repositories::courses::fetch_one_by_id(state.db(), &course.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated course"))?;

    view_cache::invalidate(
        state.redis(),
        &[
            view_cache::course_edit(&course.id),
            view_cache::instructor_courses(&instructor.id),
            view_cache::CATALOG.to_string(),
        ],
    )
    .await;

    Ok(Json(CourseResponse::from_db(updated)))
}

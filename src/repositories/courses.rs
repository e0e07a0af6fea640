use sqlx::{FromRow, PgPool};
use time::PrimitiveDateTime;

use crate::db::models::Course;

const COURSE_COLUMNS: &str =
    "id, title, description, thumbnail_url, instructor_id, created_at, updated_at";

pub(crate) struct CreateCourse<'a> {
    pub(crate) id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) thumbnail_url: Option<&'a str>,
    pub(crate) instructor_id: &'a str,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// `description` is tri-state: absent leaves the column alone, `Some(None)`
/// clears it to NULL.
pub(crate) struct UpdateCourse {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<Option<String>>,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Catalog listing row: course plus instructor display name and counts.
#[derive(Debug, FromRow)]
pub(crate) struct CatalogCourse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) thumbnail_url: Option<String>,
    pub(crate) instructor_name: String,
    pub(crate) module_count: i64,
    pub(crate) enrollment_count: i64,
    pub(crate) created_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateCourse<'_>) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "INSERT INTO courses (
            id, title, description, thumbnail_url, instructor_id, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7)
         RETURNING {COURSE_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.thumbnail_url)
    .bind(params.instructor_id)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    course_id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"))
        .bind(course_id)
        .fetch_optional(pool)
        .await
}

/// Ownership-scoped lookup: a course that is missing and a course owned by
/// another instructor are indistinguishable to the caller.
pub(crate) async fn find_owned(
    pool: &PgPool,
    course_id: &str,
    instructor_id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1 AND instructor_id = $2",
    ))
    .bind(course_id)
    .bind(instructor_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_for_instructor(
    pool: &PgPool,
    instructor_id: &str,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses
         WHERE instructor_id = $1
         ORDER BY created_at DESC",
    ))
    .bind(instructor_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    course_id: &str,
    params: UpdateCourse,
) -> Result<(), sqlx::Error> {
    let set_description = params.description.is_some();
    sqlx::query(
        "UPDATE courses SET
            title = COALESCE($1, title),
            description = CASE WHEN $2 THEN $3 ELSE description END,
            updated_at = $4
         WHERE id = $5",
    )
    .bind(params.title)
    .bind(set_description)
    .bind(params.description.flatten())
    .bind(params.updated_at)
    .bind(course_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn fetch_one_by_id(pool: &PgPool, course_id: &str) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"))
        .bind(course_id)
        .fetch_one(pool)
        .await
}

#[derive(Debug, FromRow)]
pub(crate) struct CourseEnrollmentCount {
    pub(crate) course_id: String,
    pub(crate) enrollment_count: i64,
}

pub(crate) async fn enrollment_counts(
    pool: &PgPool,
    course_ids: &[String],
) -> Result<Vec<CourseEnrollmentCount>, sqlx::Error> {
    sqlx::query_as::<_, CourseEnrollmentCount>(
        "SELECT course_id, COUNT(*) AS enrollment_count
         FROM enrollments
         WHERE course_id = ANY($1)
         GROUP BY course_id",
    )
    .bind(course_ids)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_catalog(pool: &PgPool) -> Result<Vec<CatalogCourse>, sqlx::Error> {
    sqlx::query_as::<_, CatalogCourse>(
        "SELECT c.id, c.title, c.description, c.thumbnail_url,
                u.full_name AS instructor_name,
                (SELECT COUNT(*) FROM modules m WHERE m.course_id = c.id) AS module_count,
                (SELECT COUNT(*) FROM enrollments e WHERE e.course_id = c.id) AS enrollment_count,
                c.created_at
         FROM courses c
         JOIN users u ON u.id = c.instructor_id
         ORDER BY c.created_at DESC",
    )
    .fetch_all(pool)
    .await
}

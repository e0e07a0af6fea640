use sqlx::{FromRow, PgPool};
use time::PrimitiveDateTime;

use crate::db::models::Enrollment;

const ENROLLMENT_COLUMNS: &str = "id, user_id, course_id, created_at";

pub(crate) struct CreateEnrollment<'a> {
    pub(crate) id: &'a str,
    pub(crate) user_id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) created_at: PrimitiveDateTime,
}

/// A student's enrolled course with the fields the enrolled-courses view
/// shows, most recent enrollment first.
#[derive(Debug, FromRow)]
pub(crate) struct EnrolledCourse {
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) thumbnail_url: Option<String>,
    pub(crate) instructor_name: String,
    pub(crate) module_count: i64,
    pub(crate) enrolled_at: PrimitiveDateTime,
}

/// Insert relies on the storage-level UNIQUE(user_id, course_id) constraint:
/// the caller maps a unique violation to the duplicate-enrollment error, so
/// two concurrent enrolls cannot both succeed.
pub(crate) async fn create(
    pool: &PgPool,
    params: CreateEnrollment<'_>,
) -> Result<Enrollment, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "INSERT INTO enrollments (id, user_id, course_id, created_at)
         VALUES ($1,$2,$3,$4)
         RETURNING {ENROLLMENT_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.user_id)
    .bind(params.course_id)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_for_user_course(
    pool: &PgPool,
    user_id: &str,
    course_id: &str,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE user_id = $1 AND course_id = $2",
    ))
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_courses_for_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<EnrolledCourse>, sqlx::Error> {
    sqlx::query_as::<_, EnrolledCourse>(
        "SELECT c.id AS course_id, c.title, c.description, c.thumbnail_url,
                u.full_name AS instructor_name,
                (SELECT COUNT(*) FROM modules m WHERE m.course_id = c.id) AS module_count,
                e.created_at AS enrolled_at
         FROM enrollments e
         JOIN courses c ON c.id = e.course_id
         JOIN users u ON u.id = c.instructor_id
         WHERE e.user_id = $1
         ORDER BY e.created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

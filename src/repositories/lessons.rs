use sqlx::{FromRow, PgPool};
use time::PrimitiveDateTime;

use crate::db::models::Lesson;

const LESSON_COLUMNS: &str = "id, title, content, position, module_id, created_at, updated_at";

pub(crate) struct CreateLesson<'a> {
    pub(crate) id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) content: &'a str,
    pub(crate) position: i32,
    pub(crate) module_id: &'a str,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) struct UpdateLesson {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) position: Option<i32>,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Lesson joined up to its owning course, for handlers that need the course
/// id to invalidate the edit view.
#[derive(Debug, FromRow)]
pub(crate) struct LessonWithCourse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) position: i32,
    pub(crate) module_id: String,
    pub(crate) course_id: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateLesson<'_>) -> Result<Lesson, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        "INSERT INTO lessons (id, title, content, position, module_id, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6,$7)
         RETURNING {LESSON_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.title)
    .bind(params.content)
    .bind(params.position)
    .bind(params.module_id)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_owned(
    pool: &PgPool,
    lesson_id: &str,
    instructor_id: &str,
) -> Result<Option<LessonWithCourse>, sqlx::Error> {
    sqlx::query_as::<_, LessonWithCourse>(
        "SELECT l.id, l.title, l.content, l.position, l.module_id,
                c.id AS course_id, l.created_at, l.updated_at
         FROM lessons l
         JOIN modules m ON m.id = l.module_id
         JOIN courses c ON c.id = m.course_id
         WHERE l.id = $1 AND c.instructor_id = $2",
    )
    .bind(lesson_id)
    .bind(instructor_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_modules(
    pool: &PgPool,
    module_ids: &[String],
) -> Result<Vec<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        "SELECT {LESSON_COLUMNS} FROM lessons WHERE module_id = ANY($1) ORDER BY position ASC",
    ))
    .bind(module_ids)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    lesson_id: &str,
    params: UpdateLesson,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE lessons SET
            title = COALESCE($1, title),
            content = COALESCE($2, content),
            position = COALESCE($3, position),
            updated_at = $4
         WHERE id = $5",
    )
    .bind(params.title)
    .bind(params.content)
    .bind(params.position)
    .bind(params.updated_at)
    .bind(lesson_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn fetch_one_by_id(pool: &PgPool, lesson_id: &str) -> Result<Lesson, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!("SELECT {LESSON_COLUMNS} FROM lessons WHERE id = $1"))
        .bind(lesson_id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn delete(pool: &PgPool, lesson_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM lessons WHERE id = $1").bind(lesson_id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

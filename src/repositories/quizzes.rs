use sqlx::{FromRow, PgPool};
use time::PrimitiveDateTime;

use crate::db::models::Quiz;

const QUIZ_COLUMNS: &str = "id, title, lesson_id, created_at, updated_at";

pub(crate) struct CreateQuiz<'a> {
    pub(crate) id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) lesson_id: &'a str,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Quiz joined up to its owning course.
#[derive(Debug, FromRow)]
pub(crate) struct QuizWithCourse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) lesson_id: String,
    pub(crate) course_id: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateQuiz<'_>) -> Result<Quiz, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "INSERT INTO quizzes (id, title, lesson_id, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {QUIZ_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.title)
    .bind(params.lesson_id)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_owned(
    pool: &PgPool,
    quiz_id: &str,
    instructor_id: &str,
) -> Result<Option<QuizWithCourse>, sqlx::Error> {
    sqlx::query_as::<_, QuizWithCourse>(
        "SELECT q.id, q.title, q.lesson_id, c.id AS course_id, q.created_at, q.updated_at
         FROM quizzes q
         JOIN lessons l ON l.id = q.lesson_id
         JOIN modules m ON m.id = l.module_id
         JOIN courses c ON c.id = m.course_id
         WHERE q.id = $1 AND c.instructor_id = $2",
    )
    .bind(quiz_id)
    .bind(instructor_id)
    .fetch_optional(pool)
    .await
}

/// Unscoped lookup used by attempt submission, which gates on enrollment in
/// the quiz's course rather than ownership.
pub(crate) async fn find_with_course(
    pool: &PgPool,
    quiz_id: &str,
) -> Result<Option<QuizWithCourse>, sqlx::Error> {
    sqlx::query_as::<_, QuizWithCourse>(
        "SELECT q.id, q.title, q.lesson_id, c.id AS course_id, q.created_at, q.updated_at
         FROM quizzes q
         JOIN lessons l ON l.id = q.lesson_id
         JOIN modules m ON m.id = l.module_id
         JOIN courses c ON c.id = m.course_id
         WHERE q.id = $1",
    )
    .bind(quiz_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_lessons(
    pool: &PgPool,
    lesson_ids: &[String],
) -> Result<Vec<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "SELECT {QUIZ_COLUMNS} FROM quizzes WHERE lesson_id = ANY($1)",
    ))
    .bind(lesson_ids)
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, quiz_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM quizzes WHERE id = $1").bind(quiz_id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

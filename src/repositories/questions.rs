use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use time::PrimitiveDateTime;

use crate::db::models::Question;

const QUESTION_COLUMNS: &str = "id, text, options, correct_answer, quiz_id, created_at";

pub(crate) struct CreateQuestion<'a> {
    pub(crate) id: &'a str,
    pub(crate) text: &'a str,
    pub(crate) options: &'a [String],
    pub(crate) correct_answer: i32,
    pub(crate) quiz_id: &'a str,
    pub(crate) created_at: PrimitiveDateTime,
}

/// Question joined up to its owning course.
#[derive(Debug, FromRow)]
pub(crate) struct QuestionWithCourse {
    pub(crate) id: String,
    pub(crate) course_id: String,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateQuestion<'_>,
) -> Result<Question, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "INSERT INTO questions (id, text, options, correct_answer, quiz_id, created_at)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {QUESTION_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.text)
    .bind(Json(params.options))
    .bind(params.correct_answer)
    .bind(params.quiz_id)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_owned(
    pool: &PgPool,
    question_id: &str,
    instructor_id: &str,
) -> Result<Option<QuestionWithCourse>, sqlx::Error> {
    sqlx::query_as::<_, QuestionWithCourse>(
        "SELECT qu.id, c.id AS course_id
         FROM questions qu
         JOIN quizzes q ON q.id = qu.quiz_id
         JOIN lessons l ON l.id = q.lesson_id
         JOIN modules m ON m.id = l.module_id
         JOIN courses c ON c.id = m.course_id
         WHERE qu.id = $1 AND c.instructor_id = $2",
    )
    .bind(question_id)
    .bind(instructor_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_quiz(
    pool: &PgPool,
    quiz_id: &str,
) -> Result<Vec<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE quiz_id = $1 ORDER BY created_at ASC",
    ))
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_quizzes(
    pool: &PgPool,
    quiz_ids: &[String],
) -> Result<Vec<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE quiz_id = ANY($1) ORDER BY created_at ASC",
    ))
    .bind(quiz_ids)
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, question_id: &str) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM questions WHERE id = $1").bind(question_id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

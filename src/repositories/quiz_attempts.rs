use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::QuizAttempt;

const ATTEMPT_COLUMNS: &str = "id, user_id, quiz_id, score, created_at";

pub(crate) struct CreateQuizAttempt<'a> {
    pub(crate) id: &'a str,
    pub(crate) user_id: &'a str,
    pub(crate) quiz_id: &'a str,
    pub(crate) score: f64,
    pub(crate) created_at: PrimitiveDateTime,
}

/// Attempts are an append-only history; there is deliberately no update or
/// upsert path here.
pub(crate) async fn create(
    pool: &PgPool,
    params: CreateQuizAttempt<'_>,
) -> Result<QuizAttempt, sqlx::Error> {
    sqlx::query_as::<_, QuizAttempt>(&format!(
        "INSERT INTO quiz_attempts (id, user_id, quiz_id, score, created_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {ATTEMPT_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.user_id)
    .bind(params.quiz_id)
    .bind(params.score)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_for_user_quiz(
    pool: &PgPool,
    user_id: &str,
    quiz_id: &str,
) -> Result<Vec<QuizAttempt>, sqlx::Error> {
    sqlx::query_as::<_, QuizAttempt>(&format!(
        "SELECT {ATTEMPT_COLUMNS} FROM quiz_attempts
         WHERE user_id = $1 AND quiz_id = $2
         ORDER BY created_at DESC",
    ))
    .bind(user_id)
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_for_user_quiz(
    pool: &PgPool,
    user_id: &str,
    quiz_id: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM quiz_attempts WHERE user_id = $1 AND quiz_id = $2",
    )
    .bind(user_id)
    .bind(quiz_id)
    .fetch_one(pool)
    .await
}

use sqlx::{FromRow, PgPool};
use time::PrimitiveDateTime;

use crate::db::models::User;
use crate::db::types::UserRole;

const USER_COLUMNS: &str =
    "id, full_name, email, hashed_password, role, created_at, updated_at";

pub(crate) struct CreateUser<'a> {
    pub(crate) id: &'a str,
    pub(crate) full_name: &'a str,
    pub(crate) email: &'a str,
    pub(crate) hashed_password: String,
    pub(crate) role: UserRole,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) struct UpdateStudent {
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) hashed_password: Option<String>,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Student listing row with the counts the roster view shows.
#[derive(Debug, FromRow)]
pub(crate) struct StudentWithCounts {
    pub(crate) id: String,
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) enrollment_count: i64,
    pub(crate) quiz_attempt_count: i64,
}

pub(crate) async fn create(pool: &PgPool, params: CreateUser<'_>) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (id, full_name, email, hashed_password, role, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6,$7)
         RETURNING {USER_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.full_name)
    .bind(params.email)
    .bind(params.hashed_password)
    .bind(params.role)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Email uniqueness probe across every role, optionally excluding one user
/// (a student keeping their own email on update).
pub(crate) async fn exists_by_email(
    pool: &PgPool,
    email: &str,
    exclude_user_id: Option<&str>,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT id FROM users WHERE email = $1 AND ($2::text IS NULL OR id <> $2)",
    )
    .bind(email)
    .bind(exclude_user_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_student_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND role = 'student'",
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_students_with_counts(
    pool: &PgPool,
) -> Result<Vec<StudentWithCounts>, sqlx::Error> {
    sqlx::query_as::<_, StudentWithCounts>(
        "SELECT u.id, u.full_name, u.email, u.created_at,
                (SELECT COUNT(*) FROM enrollments e WHERE e.user_id = u.id) AS enrollment_count,
                (SELECT COUNT(*) FROM quiz_attempts a WHERE a.user_id = u.id) AS quiz_attempt_count
         FROM users u
         WHERE u.role = 'student'
         ORDER BY u.created_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub(crate) async fn update_student(
    pool: &PgPool,
    id: &str,
    params: UpdateStudent,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET
            full_name = $1,
            email = $2,
            hashed_password = COALESCE($3, hashed_password),
            updated_at = $4
         WHERE id = $5 AND role = 'student'",
    )
    .bind(params.full_name)
    .bind(params.email)
    .bind(params.hashed_password)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Hard delete, scoped to students so an instructor id through this path is
/// a no-op.
pub(crate) async fn delete_student(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = 'student'")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn fetch_one_by_id(pool: &PgPool, id: &str) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
}

use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Module;

const MODULE_COLUMNS: &str = "id, title, position, course_id, created_at, updated_at";

pub(crate) struct CreateModule<'a> {
    pub(crate) id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) position: i32,
    pub(crate) course_id: &'a str,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) struct UpdateModule {
    pub(crate) title: Option<String>,
    pub(crate) position: Option<i32>,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateModule<'_>) -> Result<Module, sqlx::Error> {
    sqlx::query_as::<_, Module>(&format!(
        "INSERT INTO modules (id, title, position, course_id, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {MODULE_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.title)
    .bind(params.position)
    .bind(params.course_id)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

/// Module reachable from a course the instructor owns; missing and
/// foreign-owned collapse to `None`.
pub(crate) async fn find_owned(
    pool: &PgPool,
    module_id: &str,
    instructor_id: &str,
) -> Result<Option<Module>, sqlx::Error> {
    sqlx::query_as::<_, Module>(
        "SELECT m.id, m.title, m.position, m.course_id, m.created_at, m.updated_at
         FROM modules m
         JOIN courses c ON c.id = m.course_id
         WHERE m.id = $1 AND c.instructor_id = $2",
    )
    .bind(module_id)
    .bind(instructor_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_course(
    pool: &PgPool,
    course_id: &str,
) -> Result<Vec<Module>, sqlx::Error> {
    sqlx::query_as::<_, Module>(&format!(
        "SELECT {MODULE_COLUMNS} FROM modules WHERE course_id = $1 ORDER BY position ASC",
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_courses(
    pool: &PgPool,
    course_ids: &[String],
) -> Result<Vec<Module>, sqlx::Error> {
    sqlx::query_as::<_, Module>(&format!(
        "SELECT {MODULE_COLUMNS} FROM modules WHERE course_id = ANY($1) ORDER BY position ASC",
    ))
    .bind(course_ids)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    module_id: &str,
    params: UpdateModule,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE modules SET
            title = COALESCE($1, title),
            position = COALESCE($2, position),
            updated_at = $3
         WHERE id = $4",
    )
    .bind(params.title)
    .bind(params.position)
    .bind(params.updated_at)
    .bind(module_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn fetch_one_by_id(pool: &PgPool, module_id: &str) -> Result<Module, sqlx::Error> {
    sqlx::query_as::<_, Module>(&format!("SELECT {MODULE_COLUMNS} FROM modules WHERE id = $1"))
        .bind(module_id)
        .fetch_one(pool)
        .await
}

/// Hard delete; lessons, quizzes, and questions fall with it via FK cascade.
pub(crate) async fn delete(pool: &PgPool, module_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM modules WHERE id = $1").bind(module_id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

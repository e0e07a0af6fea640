use uuid::Uuid;

use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;

/// Seed the first instructor account from FIRST_INSTRUCTOR_* settings so a
/// fresh deployment has someone who can author courses and provision
/// students.
pub(crate) async fn ensure_first_instructor(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().admin();
    if admin.first_instructor_email.is_empty() || admin.first_instructor_password.is_empty() {
        tracing::warn!(
            "FIRST_INSTRUCTOR_EMAIL/FIRST_INSTRUCTOR_PASSWORD not configured; \
             skipping instructor seed"
        );
        return Ok(());
    }

    let email = &admin.first_instructor_email;
    let user = repositories::users::find_by_email(state.db(), email).await?;
    let now = primitive_now_utc();

    if let Some(user) = user {
        let mut needs_update = false;
        let verified =
            security::verify_password(&admin.first_instructor_password, &user.hashed_password)
                .unwrap_or(false);

        let hashed_password = if verified {
            user.hashed_password.clone()
        } else {
            needs_update = true;
            security::hash_password(&admin.first_instructor_password)?
        };

        let role = if user.role != UserRole::Instructor {
            needs_update = true;
            UserRole::Instructor
        } else {
            user.role
        };

        if needs_update {
            sqlx::query(
                "UPDATE users
                 SET hashed_password = $1,
                     role = $2,
                     updated_at = $3
                 WHERE id = $4",
            )
            .bind(hashed_password)
            .bind(role)
            .bind(now)
            .bind(user.id)
            .execute(state.db())
            .await?;

            tracing::info!("Updated default instructor {email}");
        } else {
            tracing::info!("Default instructor already up to date");
        }

        return Ok(());
    }

    let hashed_password = security::hash_password(&admin.first_instructor_password)?;

    repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            id: &Uuid::new_v4().to_string(),
            full_name: &admin.first_instructor_name,
            email,
            hashed_password,
            role: UserRole::Instructor,
            created_at: now,
            updated_at: now,
        },
    )
    .await?;

    tracing::info!("Created default instructor {email}");
    Ok(())
}

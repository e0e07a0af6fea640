use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::types::UserRole;
use crate::repositories::users::StudentWithCounts;

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: String,
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) role: UserRole,
    pub(crate) created_at: String,
}

impl UserResponse {
    pub(crate) fn from_db(user: crate::db::models::User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            created_at: format_primitive(user.created_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct StudentCreate {
    #[serde(alias = "name", alias = "fullName")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub(crate) full_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub(crate) email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub(crate) password: String,
}

/// Password is only replaced when a non-blank value is supplied; omission or
/// blank keeps the existing credential.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct StudentUpdate {
    #[serde(alias = "name", alias = "fullName")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub(crate) full_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub(crate) email: String,
    #[serde(default)]
    pub(crate) password: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentResponse {
    pub(crate) id: String,
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) enrollment_count: i64,
    pub(crate) quiz_attempt_count: i64,
    pub(crate) created_at: String,
}

impl StudentResponse {
    pub(crate) fn from_row(row: StudentWithCounts) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            enrollment_count: row.enrollment_count,
            quiz_attempt_count: row.quiz_attempt_count,
            created_at: format_primitive(row.created_at),
        }
    }
}

//! Thin CRUD shell around the matching engine: persistence, storage, HTTP handlers.

pub mod applications;
pub mod jobs;
pub mod repository;
pub mod storage;
pub mod users;

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRow;

/// Caller identity. Authentication happens upstream of this service.
#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

pub(crate) async fn require_user(pool: &PgPool, user_id: Uuid) -> Result<UserRow, AppError> {
    repository::get_user(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
}

pub(crate) async fn require_recruiter(pool: &PgPool, user_id: Uuid) -> Result<UserRow, AppError> {
    let user = require_user(pool, user_id).await?;
    if !user.is_recruiter {
        return Err(AppError::Forbidden("Recruiter access required".to_string()));
    }
    Ok(user)
}

/// Column widths enforced by the schema. Longer input is a 400, not a database error.
pub const MAX_USERNAME_LEN: usize = 80;
pub const MAX_EMAIL_LEN: usize = 120;
pub const MAX_JOB_TITLE_LEN: usize = 100;

pub(crate) fn require_max_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.trim().chars().count() > max {
        return Err(AppError::Validation(format!("{field} must be at most {max} characters")));
    }
    Ok(())
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

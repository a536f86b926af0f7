//! Axum route handlers for users, resumes and the admin listings.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::portal::repository::{self, NewUser};
use crate::portal::storage;
use crate::portal::{
    require_max_len, require_non_empty, require_user, UserIdQuery, MAX_EMAIL_LEN,
    MAX_USERNAME_LEN,
};
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";
const DEFAULT_RESUME_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub external_id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_recruiter: bool,
}

impl CreateUserRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("external_id", &self.external_id)?;
        require_non_empty("username", &self.username)?;
        require_non_empty("email", &self.email)?;
        require_max_len("username", &self.username, MAX_USERNAME_LEN)?;
        require_max_len("email", &self.email, MAX_EMAIL_LEN)?;
        if !self.email.contains('@') {
            return Err(AppError::Validation(format!(
                "'{}' is not an email address",
                self.email
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ViewerQuery {
    pub viewer_id: Uuid,
}

/// POST /api/v1/users
pub async fn handle_create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserRow>), AppError> {
    request.validate()?;

    if repository::find_user_by_email(&state.db, request.email.trim())
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let user = repository::insert_user(
        &state.db,
        NewUser {
            external_id: request.external_id.trim(),
            username: request.username.trim(),
            email: request.email.trim(),
            is_recruiter: request.is_recruiter,
        },
    )
    .await?;

    info!("Created user {} (recruiter: {})", user.id, user.is_recruiter);
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/v1/users/:id/resume
///
/// Sends the uploaded file to the resume parser, stores it under a fresh key
/// and then switches the profile over to it. A parser or storage failure
/// leaves the profile and the previously stored resume as they were.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UserRow>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("No selected file".to_string()))?;
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_RESUME_CONTENT_TYPE)
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        upload = Some((filename, content_type, data));
        break;
    }

    let (filename, content_type, data) =
        upload.ok_or_else(|| AppError::Validation("No file part".to_string()))?;
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let user = require_user(&state.db, user_id).await?;

    let key = storage::resume_key(user.id, Uuid::new_v4(), &filename);
    let parsed = state
        .resume_parser
        .parse(storage::key_filename(&key), &content_type, data.clone())
        .await?;

    storage::put_resume(&state.s3, &state.config.s3_bucket, &key, &content_type, data).await?;
    let user = repository::update_profile(&state.db, user.id, &key, &parsed).await?;
    info!(
        "Resume parsed for user {} in {:.3}s",
        user.id, parsed.parse_time
    );
    Ok(Json(user))
}

/// GET /api/v1/users/:id/resume?viewer_id=
///
/// Owners may download their own resume; recruiters may download anyone's.
pub async fn handle_download_resume(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<ViewerQuery>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = require_user(&state.db, params.viewer_id).await?;
    if viewer.id != user_id && !viewer.is_recruiter {
        return Err(AppError::Forbidden("You are not authorized to download resumes".to_string()));
    }

    let owner = if viewer.id == user_id {
        viewer
    } else {
        require_user(&state.db, user_id).await?
    };
    let key = owner
        .resume_key
        .ok_or_else(|| AppError::NotFound("No resume uploaded".to_string()))?;

    let data = storage::get_resume(&state.s3, &state.config.s3_bucket, &key).await?;
    let disposition = format!("attachment; filename=\"{}\"", storage::key_filename(&key));

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    ))
}

async fn require_admin(state: &AppState, user_id: Uuid) -> Result<(), AppError> {
    let user = require_user(&state.db, user_id).await?;
    if !user.is_admin {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    Ok(())
}

/// GET /api/v1/admin/recruiters
pub async fn handle_list_recruiters(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<UserRow>>, AppError> {
    require_admin(&state, params.user_id).await?;
    Ok(Json(repository::list_users_by_role(&state.db, true).await?))
}

/// GET /api/v1/admin/jobseekers
pub async fn handle_list_jobseekers(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<UserRow>>, AppError> {
    require_admin(&state, params.user_id).await?;
    Ok(Json(repository::list_users_by_role(&state.db, false).await?))
}

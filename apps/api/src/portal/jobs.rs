//! Axum route handlers for job postings.

use std::collections::{BTreeMap, HashMap};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::overlap::MatchResult;
use crate::models::job::JobRow;
use crate::portal::repository::{self, NewJob};
use crate::portal::{
    require_max_len, require_non_empty, require_recruiter, require_user, UserIdQuery,
    MAX_JOB_TITLE_LEN,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PostJobRequest {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: String,
    #[serde(default)]
    pub skills: Option<String>,
}

impl PostJobRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("title", &self.title)?;
        require_max_len("title", &self.title, MAX_JOB_TITLE_LEN)?;
        require_non_empty("description", &self.description)?;
        require_non_empty("requirements", &self.requirements)
    }
}

#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    pub job: JobRow,
    /// The viewer's live overlap match. Empty when no resume is on file.
    pub match_result: MatchResult,
    pub applied: bool,
    /// Recruiters only: live match per application id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant_matches: Option<BTreeMap<Uuid, MatchResult>>,
}

/// POST /api/v1/jobs
pub async fn handle_post_job(
    State(state): State<AppState>,
    Json(request): Json<PostJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    request.validate()?;
    let recruiter = require_recruiter(&state.db, request.user_id).await?;

    let job = repository::insert_job(
        &state.db,
        NewJob {
            title: request.title.trim(),
            description: &request.description,
            requirements: &request.requirements,
            skills: request.skills.as_deref(),
            posted_by: recruiter.id,
        },
    )
    .await?;

    info!("Job {} posted by {}", job.id, recruiter.id);
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    Ok(Json(repository::list_active_jobs(&state.db).await?))
}

/// GET /api/v1/jobs/:id?user_id=
///
/// Match scores are computed live on every request.
pub async fn handle_job_detail(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<JobDetailResponse>, AppError> {
    let viewer = require_user(&state.db, params.user_id).await?;
    let job = repository::get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let applied = repository::find_application(&state.db, job_id, viewer.id)
        .await?
        .is_some();

    let match_result = state.ranking.viewer_match(&job, &viewer);
    debug!(
        "Job {} viewer {} live score {:.1}% [{}]",
        job.id,
        viewer.id,
        match_result.score,
        match_result.matched_tokens().collect::<Vec<_>>().join(", ")
    );

    let applicant_matches = if viewer.is_recruiter {
        let applications = repository::list_job_applications(&state.db, job_id).await?;
        let user_ids: Vec<Uuid> = applications.iter().map(|a| a.user_id).collect();
        let users: HashMap<Uuid, _> = repository::get_users(&state.db, &user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        Some(state.ranking.applicant_matches(
            &job,
            applications.iter().map(|a| (a.id, users.get(&a.user_id))),
        ))
    } else {
        None
    };

    Ok(Json(JobDetailResponse {
        job,
        match_result,
        applied,
        applicant_matches,
    }))
}

/// DELETE /api/v1/jobs/:id?user_id=
///
/// Only the recruiter who posted the job may delete it. Its applications go with it.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    let job = repository::get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    let user = require_user(&state.db, params.user_id).await?;

    if !user.is_recruiter || job.posted_by != user.id {
        return Err(AppError::Forbidden("You are not authorized to delete this job".to_string()));
    }

    repository::delete_job(&state.db, job_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, description: &str, requirements: &str) -> PostJobRequest {
        PostJobRequest {
            user_id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            requirements: requirements.to_string(),
            skills: Some("rust,sql".to_string()),
        }
    }

    #[test]
    fn test_complete_posting_is_valid() {
        assert!(request("Rust Engineer", "Build services", "3y Rust").validate().is_ok());
    }

    #[test]
    fn test_missing_text_fields_rejected() {
        for req in [
            request("", "d", "r"),
            request("t", " ", "r"),
            request("t", "d", "\n"),
        ] {
            assert!(matches!(req.validate(), Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn test_overlong_title_rejected() {
        let title = "T".repeat(MAX_JOB_TITLE_LEN + 1);
        assert!(matches!(
            request(&title, "d", "r").validate(),
            Err(AppError::Validation(_))
        ));
        assert!(request(&"T".repeat(MAX_JOB_TITLE_LEN), "d", "r").validate().is_ok());
    }

    #[test]
    fn test_long_skill_list_is_accepted() {
        let mut req = request("Data Engineer", "d", "r");
        req.skills = Some(vec!["skill"; 200].join(", "));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_skills_are_optional_in_payload() {
        let req: PostJobRequest = serde_json::from_str(&format!(
            r#"{{"user_id": "{}", "title": "t", "description": "d", "requirements": "r"}}"#,
            Uuid::nil()
        ))
        .unwrap();
        assert!(req.skills.is_none());
    }
}

//! Axum route handlers for applying, dashboards and recruiter stats.

use std::time::Instant;

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::ranking::{Notification, RankedJob};
use crate::matching::skills::SkillMatch;
use crate::matching::stats::{compute_stats, StatsSnapshot};
use crate::models::application::ApplicationRow;
use crate::models::job::JobRow;
use crate::portal::repository::{self, NewApplication};
use crate::portal::{require_recruiter, require_user, UserIdQuery};
use crate::state::AppState;

const DUPLICATE_APPLICATION: &str = "You have already applied for this job";

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub user_id: Uuid,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub application: ApplicationRow,
    /// Frozen skill-list score. Differs from the live overlap score on job pages.
    pub match_score: f64,
}

#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DashboardResponse {
    Candidate {
        jobs: Vec<RankedJob>,
        applications: Vec<ApplicationRow>,
        notifications: Vec<Notification>,
        search_query: String,
    },
    Recruiter {
        jobs: Vec<JobRow>,
        applications: Vec<ApplicationRow>,
    },
}

/// POST /api/v1/jobs/:id/apply?user_id=
///
/// Duplicate prevention is a read followed by a write. The insert is guarded
/// by the `(job_id, user_id)` unique key, so a request that loses the race
/// gets the same 409 as one caught by the read.
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<(StatusCode, Json<ApplyResponse>), AppError> {
    let user = require_user(&state.db, params.user_id).await?;
    if !user.has_resume() {
        return Err(AppError::Validation("Please upload your resume first".to_string()));
    }

    let job = repository::get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    if repository::find_application(&state.db, job.id, user.id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(DUPLICATE_APPLICATION.to_string()));
    }

    let started = Instant::now();
    let skill_match = SkillMatch::compute(user.skills.as_deref(), job.skills.as_deref());
    let match_calc_time = started.elapsed().as_secs_f64();

    let application = repository::insert_application(
        &state.db,
        NewApplication {
            job_id: job.id,
            user_id: user.id,
            match_score: skill_match.score,
            resume_parse_time: user.resume_parse_time,
            match_calc_time,
        },
    )
    .await?
    .ok_or_else(|| AppError::Conflict(DUPLICATE_APPLICATION.to_string()))?;

    info!(
        "User {} applied to job {} (match score {:.1}%)",
        user.id, job.id, skill_match.score
    );

    Ok((
        StatusCode::CREATED,
        Json(ApplyResponse {
            application,
            match_score: skill_match.score,
        }),
    ))
}

/// GET /api/v1/dashboard?user_id=&search=
///
/// Candidates get every active job ranked by live match score plus
/// notifications; recruiters get their postings and the applications to them.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let user = require_user(&state.db, params.user_id).await?;

    if user.is_recruiter {
        let jobs = repository::list_jobs_posted_by(&state.db, user.id).await?;
        let applications = repository::list_recruiter_applications(&state.db, user.id).await?;
        return Ok(Json(DashboardResponse::Recruiter { jobs, applications }));
    }

    let search_query = params
        .search
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .unwrap_or_default();

    let jobs = repository::list_active_jobs(&state.db).await?;
    let applications = repository::list_user_applications(&state.db, user.id).await?;
    let ranking = state
        .ranking
        .rank_for_candidate(&user, jobs, Some(search_query.as_str()));

    Ok(Json(DashboardResponse::Candidate {
        jobs: ranking.jobs,
        applications,
        notifications: ranking.notifications,
        search_query,
    }))
}

/// GET /api/v1/stats?user_id=
pub async fn handle_stats(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<StatsSnapshot>, AppError> {
    require_recruiter(&state.db, params.user_id).await?;

    let total_jobs = repository::count_jobs(&state.db).await?;
    let metrics = repository::list_application_metrics(&state.db).await?;

    let total_jobs = u64::try_from(total_jobs).context("job count out of range")?;

    Ok(Json(compute_stats(total_jobs, &metrics)))
}

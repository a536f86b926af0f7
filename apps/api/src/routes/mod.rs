pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::portal::{applications, jobs, users};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Users & resumes
        .route("/api/v1/users", post(users::handle_create_user))
        .route(
            "/api/v1/users/:id/resume",
            post(users::handle_upload_resume)
                .get(users::handle_download_resume)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        // Jobs
        .route("/api/v1/jobs", get(jobs::handle_list_jobs).post(jobs::handle_post_job))
        .route("/api/v1/jobs/:id", get(jobs::handle_job_detail).delete(jobs::handle_delete_job))
        .route("/api/v1/jobs/:id/apply", post(applications::handle_apply))
        // Dashboards & stats
        .route("/api/v1/dashboard", get(applications::handle_dashboard))
        .route("/api/v1/stats", get(applications::handle_stats))
        // Admin
        .route("/api/v1/admin/recruiters", get(users::handle_list_recruiters))
        .route("/api/v1/admin/jobseekers", get(users::handle_list_jobseekers))
        .with_state(state)
}

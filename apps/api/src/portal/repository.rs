//! SQL access for users, jobs and applications. Runtime-checked `query_as` only.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::application::{ApplicationMetrics, ApplicationRow};
use crate::models::job::JobRow;
use crate::models::user::UserRow;
use crate::resume_parser::ParsedResume;

pub struct NewUser<'a> {
    pub external_id: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub is_recruiter: bool,
}

pub struct NewJob<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub requirements: &'a str,
    pub skills: Option<&'a str>,
    pub posted_by: Uuid,
}

pub struct NewApplication {
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub match_score: f64,
    pub resume_parse_time: Option<f64>,
    pub match_calc_time: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Users
// ────────────────────────────────────────────────────────────────────────────

pub async fn insert_user(pool: &PgPool, user: NewUser<'_>) -> sqlx::Result<UserRow> {
    sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (external_id, username, email, is_recruiter)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(user.external_id)
    .bind(user.username)
    .bind(user.email)
    .bind(user.is_recruiter)
    .fetch_one(pool)
    .await
}

pub async fn get_user(pool: &PgPool, user_id: Uuid) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_user_by_email(pool: &PgPool, email: &str) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE lower(email) = lower($1)")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn get_users(pool: &PgPool, user_ids: &[Uuid]) -> sqlx::Result<Vec<UserRow>> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ANY($1)")
        .bind(user_ids)
        .fetch_all(pool)
        .await
}

/// Recruiters, or job seekers (neither recruiter nor admin).
pub async fn list_users_by_role(pool: &PgPool, recruiters: bool) -> sqlx::Result<Vec<UserRow>> {
    let sql = if recruiters {
        "SELECT * FROM users WHERE is_recruiter ORDER BY username"
    } else {
        "SELECT * FROM users WHERE NOT is_recruiter AND NOT is_admin ORDER BY username"
    };
    sqlx::query_as::<_, UserRow>(sql).fetch_all(pool).await
}

/// Replaces the parsed profile after a successful resume upload.
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    resume_key: &str,
    parsed: &ParsedResume,
) -> sqlx::Result<UserRow> {
    let user = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET resume_key = $2, skills = $3, experience = $4, resume_parse_time = $5
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(resume_key)
    .bind(&parsed.skills)
    .bind(&parsed.experience)
    .bind(parsed.parse_time)
    .fetch_one(pool)
    .await?;

    info!("Updated parsed profile for user {user_id}");
    Ok(user)
}

// ────────────────────────────────────────────────────────────────────────────
// Jobs
// ────────────────────────────────────────────────────────────────────────────

pub async fn insert_job(pool: &PgPool, job: NewJob<'_>) -> sqlx::Result<JobRow> {
    sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs (title, description, requirements, skills, posted_by)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(job.title)
    .bind(job.description)
    .bind(job.requirements)
    .bind(job.skills)
    .bind(job.posted_by)
    .fetch_one(pool)
    .await
}

pub async fn get_job(pool: &PgPool, job_id: Uuid) -> sqlx::Result<Option<JobRow>> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await
}

/// Newest first; ranking keeps this order between equal scores.
pub async fn list_active_jobs(pool: &PgPool) -> sqlx::Result<Vec<JobRow>> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE is_active ORDER BY posted_date DESC")
        .fetch_all(pool)
        .await
}

pub async fn list_jobs_posted_by(pool: &PgPool, recruiter_id: Uuid) -> sqlx::Result<Vec<JobRow>> {
    sqlx::query_as::<_, JobRow>(
        "SELECT * FROM jobs WHERE posted_by = $1 ORDER BY posted_date DESC",
    )
    .bind(recruiter_id)
    .fetch_all(pool)
    .await
}

pub async fn count_jobs(pool: &PgPool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
        .fetch_one(pool)
        .await
}

/// Deletes a job together with its applications, atomically.
pub async fn delete_job(pool: &PgPool, job_id: Uuid) -> sqlx::Result<u64> {
    let mut tx = pool.begin().await?;

    let applications = sqlx::query("DELETE FROM job_applications WHERE job_id = $1")
        .bind(job_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(job_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!("Deleted job {job_id} and {applications} applications");
    Ok(applications)
}

// ────────────────────────────────────────────────────────────────────────────
// Applications
// ────────────────────────────────────────────────────────────────────────────

pub async fn find_application(
    pool: &PgPool,
    job_id: Uuid,
    user_id: Uuid,
) -> sqlx::Result<Option<ApplicationRow>> {
    sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM job_applications WHERE job_id = $1 AND user_id = $2",
    )
    .bind(job_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Inserts an application. Returns `None` when the `(job_id, user_id)` pair
/// already exists, i.e. a concurrent request won the race after the caller's
/// duplicate check.
pub async fn insert_application(
    pool: &PgPool,
    application: NewApplication,
) -> sqlx::Result<Option<ApplicationRow>> {
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO job_applications
            (job_id, user_id, match_score, resume_parse_time, match_calc_time)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (job_id, user_id) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(application.job_id)
    .bind(application.user_id)
    .bind(application.match_score)
    .bind(application.resume_parse_time)
    .bind(application.match_calc_time)
    .fetch_optional(pool)
    .await
}

pub async fn list_user_applications(
    pool: &PgPool,
    user_id: Uuid,
) -> sqlx::Result<Vec<ApplicationRow>> {
    sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM job_applications WHERE user_id = $1 ORDER BY applied_date DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn list_job_applications(
    pool: &PgPool,
    job_id: Uuid,
) -> sqlx::Result<Vec<ApplicationRow>> {
    sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM job_applications WHERE job_id = $1 ORDER BY applied_date",
    )
    .bind(job_id)
    .fetch_all(pool)
    .await
}

/// Applications to any job posted by `recruiter_id`.
pub async fn list_recruiter_applications(
    pool: &PgPool,
    recruiter_id: Uuid,
) -> sqlx::Result<Vec<ApplicationRow>> {
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        SELECT a.*
        FROM job_applications a
        JOIN jobs j ON j.id = a.job_id
        WHERE j.posted_by = $1
        ORDER BY a.applied_date DESC
        "#,
    )
    .bind(recruiter_id)
    .fetch_all(pool)
    .await
}

pub async fn list_application_metrics(pool: &PgPool) -> sqlx::Result<Vec<ApplicationMetrics>> {
    sqlx::query_as::<_, ApplicationMetrics>(
        "SELECT match_score, resume_parse_time, match_calc_time FROM job_applications",
    )
    .fetch_all(pool)
    .await
}

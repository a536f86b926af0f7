//! Fixtures shared by handler and router tests.
//!
//! Database-backed tests call [`database_pool`], which returns `None` (and the
//! test returns early) unless `DATABASE_URL` points at a scratch Postgres.

use std::sync::Arc;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use bytes::Bytes;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use uuid::Uuid;

use crate::config::Config;
use crate::db::lazy_pool;
use crate::matching::overlap::OverlapScorer;
use crate::matching::ranking::RankingEngine;
use crate::matching::MatchConfig;
use crate::models::job::JobRow;
use crate::models::user::UserRow;
use crate::portal::repository::{self, NewJob, NewUser};
use crate::resume_parser::{ParsedResume, ResumeParser, ResumeParserError};
use crate::state::AppState;

const SCHEMA: &str = include_str!("../migrations/0001_job_portal.sql");
const SCHEMA_LOCK: i64 = 0x6a6f_626d;

/// Parser double: returns a fixed profile, or fails like an exhausted provider.
#[derive(Debug, Clone)]
pub enum StubParser {
    Parsed(ParsedResume),
    Failing,
}

impl Default for StubParser {
    fn default() -> Self {
        StubParser::Parsed(ParsedResume::default())
    }
}

#[async_trait]
impl ResumeParser for StubParser {
    async fn parse(
        &self,
        _filename: &str,
        _content_type: &str,
        _file: Bytes,
    ) -> Result<ParsedResume, ResumeParserError> {
        match self {
            StubParser::Parsed(parsed) => Ok(parsed.clone()),
            StubParser::Failing => Err(ResumeParserError::Exhausted { retries: 3 }),
        }
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/jobmatch_test".to_string(),
        db_max_connections: 1,
        s3_bucket: "resumes".to_string(),
        s3_endpoint: "http://localhost:9000".to_string(),
        aws_access_key_id: "test".to_string(),
        aws_secret_access_key: "test".to_string(),
        resume_parser_api_key: "test".to_string(),
        resume_parser_url: "http://localhost:9999".to_string(),
        max_upload_bytes: 1024,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

pub fn test_state(db: PgPool, parser: StubParser) -> AppState {
    let match_config = MatchConfig::default();
    let s3_config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .build();
    AppState {
        db,
        s3: aws_sdk_s3::Client::from_conf(s3_config),
        config: test_config(),
        ranking: RankingEngine::new(
            Arc::new(OverlapScorer::new(match_config.tokenizer())),
            &match_config,
        ),
        resume_parser: Arc::new(parser),
    }
}

/// State whose pool never connects. For paths that fail before any query.
pub fn offline_state() -> AppState {
    test_state(lazy_pool(), StubParser::default())
}

/// Connects to `DATABASE_URL` and applies the schema. `None` when unset.
pub async fn database_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("connect to DATABASE_URL");

    let mut tx = pool.begin().await.expect("begin schema transaction");
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK)
        .execute(&mut *tx)
        .await
        .expect("take schema lock");
    (&mut *tx).execute(SCHEMA).await.expect("apply schema");
    tx.commit().await.expect("commit schema");

    Some(pool)
}

pub async fn create_user(pool: &PgPool, is_recruiter: bool) -> UserRow {
    let tag = Uuid::new_v4().simple().to_string();
    repository::insert_user(
        pool,
        NewUser {
            external_id: &format!("ext|{tag}"),
            username: &format!("user-{tag}"),
            email: &format!("{tag}@example.com"),
            is_recruiter,
        },
    )
    .await
    .expect("insert user")
}

/// A job seeker with a resume on file and the given skill list.
pub async fn create_candidate(pool: &PgPool, skills: &str) -> UserRow {
    let user = create_user(pool, false).await;
    let parsed = ParsedResume {
        skills: skills.to_string(),
        experience: "Backend development".to_string(),
        parse_time: 0.25,
    };
    let key = format!("resumes/{}/{}/cv.pdf", user.id, Uuid::new_v4());
    repository::update_profile(pool, user.id, &key, &parsed)
        .await
        .expect("store parsed profile")
}

pub async fn create_job(pool: &PgPool, recruiter_id: Uuid, skills: &str) -> JobRow {
    repository::insert_job(
        pool,
        NewJob {
            title: "Backend Engineer",
            description: "Python backend services",
            requirements: "SQL and Rust",
            skills: Some(skills),
            posted_by: recruiter_id,
        },
    )
    .await
    .expect("insert job")
}

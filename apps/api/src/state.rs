use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::matching::ranking::RankingEngine;
use crate::resume_parser::ResumeParser;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub config: Config,
    /// Live overlap scoring, ranking and notifications.
    pub ranking: RankingEngine,
    /// Pluggable resume parser. Default: `AffindaClient`.
    pub resume_parser: Arc<dyn ResumeParser>,
}

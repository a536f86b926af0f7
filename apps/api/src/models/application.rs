use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    /// Skill-list score frozen at apply time.
    pub match_score: Option<f64>,
    pub applied_date: DateTime<Utc>,
    pub resume_parse_time: Option<f64>,
    pub match_calc_time: Option<f64>,
}

/// Per-application values the stats engine averages over.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct ApplicationMetrics {
    pub match_score: Option<f64>,
    pub resume_parse_time: Option<f64>,
    pub match_calc_time: Option<f64>,
}

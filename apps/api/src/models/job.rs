use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: String,
    /// Comma-delimited skill list used by the apply-time skill scorer.
    pub skills: Option<String>,
    pub posted_by: Uuid,
    pub posted_date: DateTime<Utc>,
    pub is_active: bool,
}

impl JobRow {
    /// Job text fields fed to the overlap scorer: description, then requirements.
    pub fn match_fields(&self) -> [&str; 2] {
        [&self.description, &self.requirements]
    }

    /// Case-insensitive substring match on title, description or requirements.
    /// `needle` must already be lowercased.
    pub fn matches_search(&self, needle: &str) -> bool {
        [&self.title, &self.description, &self.requirements]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub external_id: String,
    pub username: String,
    pub email: String,
    pub is_recruiter: bool,
    pub is_admin: bool,
    /// Object-storage key of the uploaded resume. `None` until the first successful upload.
    pub resume_key: Option<String>,
    pub skills: Option<String>,
    pub experience: Option<String>,
    /// Seconds spent in the external parser for the current resume.
    pub resume_parse_time: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub fn has_resume(&self) -> bool {
        self.resume_key.is_some()
    }

    pub fn has_skills(&self) -> bool {
        self.skills.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Profile text fields fed to the overlap scorer: skills, then experience.
    pub fn profile_fields(&self) -> [&str; 2] {
        [
            self.skills.as_deref().unwrap_or_default(),
            self.experience.as_deref().unwrap_or_default(),
        ]
    }
}

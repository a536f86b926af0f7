//! Ranking & notifications: live match scores for dashboards and job pages.
//!
//! Scores are recomputed on every render; nothing here is cached or persisted.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::matching::overlap::{MatchResult, MatchScorer};
use crate::matching::MatchConfig;
use crate::models::job::JobRow;
use crate::models::user::UserRow;

/// A job paired with the viewer's live overlap score. Presentation only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedJob {
    pub job: JobRow,
    pub score: f64,
}

/// A job recommended to a candidate because its score cleared the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub job_id: Uuid,
    pub title: String,
    pub match_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRanking {
    pub jobs: Vec<RankedJob>,
    pub notifications: Vec<Notification>,
}

#[derive(Clone)]
pub struct RankingEngine {
    scorer: Arc<dyn MatchScorer>,
    notification_threshold: f64,
}

impl RankingEngine {
    pub fn new(scorer: Arc<dyn MatchScorer>, config: &MatchConfig) -> Self {
        Self {
            scorer,
            notification_threshold: config.notification_threshold,
        }
    }

    pub fn notification_threshold(&self) -> f64 {
        self.notification_threshold
    }

    /// The viewer's own match against one job. Zero when no resume is on file.
    pub fn viewer_match(&self, job: &JobRow, viewer: &UserRow) -> MatchResult {
        if !viewer.has_resume() {
            return MatchResult::empty();
        }
        self.scorer.score(&job.match_fields(), &viewer.profile_fields())
    }

    /// Scores `candidate` against every job, emits notifications, applies the
    /// optional search filter and sorts by descending score.
    ///
    /// Scores and notifications cover the full job list; the filter only
    /// narrows what is returned. Equal scores keep their input order.
    pub fn rank_for_candidate(
        &self,
        candidate: &UserRow,
        jobs: Vec<JobRow>,
        search: Option<&str>,
    ) -> CandidateRanking {
        let scores: Vec<f64> = if candidate.has_resume() {
            let profile = candidate.profile_fields();
            jobs.iter()
                .map(|job| self.scorer.score(&job.match_fields(), &profile).score)
                .collect()
        } else {
            vec![0.0; jobs.len()]
        };

        let notifications: Vec<Notification> = jobs
            .iter()
            .zip(&scores)
            .filter(|(_, score)| **score > self.notification_threshold)
            .map(|(job, score)| Notification {
                job_id: job.id,
                title: job.title.clone(),
                match_score: *score,
            })
            .collect();

        let needle = search
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        let mut ranked: Vec<RankedJob> = jobs
            .into_iter()
            .zip(scores)
            .filter(|(job, _)| needle.as_deref().map_or(true, |n| job.matches_search(n)))
            .map(|(job, score)| RankedJob { job, score })
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(
            "Ranked {} jobs for user {} ({} notifications)",
            ranked.len(),
            candidate.id,
            notifications.len()
        );

        CandidateRanking {
            jobs: ranked,
            notifications,
        }
    }

    /// Recruiter view: one match result per application, keyed by application id.
    /// Applicants without skills on file get an empty result.
    pub fn applicant_matches<'a>(
        &self,
        job: &JobRow,
        applicants: impl IntoIterator<Item = (Uuid, Option<&'a UserRow>)>,
    ) -> BTreeMap<Uuid, MatchResult> {
        let job_fields = job.match_fields();
        applicants
            .into_iter()
            .map(|(application_id, user)| {
                let result = match user {
                    Some(user) if user.has_skills() => {
                        self.scorer.score(&job_fields, &user.profile_fields())
                    }
                    _ => MatchResult::empty(),
                };
                (application_id, result)
            })
            .collect()
    }
}

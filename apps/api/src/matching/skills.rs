//! Skill-list scorer: the score frozen into an application when it is created.
//!
//! Works on raw comma-separated values, not on tokens: no length filter, no
//! stopwords, no whitespace trimming. It is a different algorithm from
//! [`crate::matching::overlap`] and the two numbers are expected to differ.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub const SKILL_DELIMITER: char = ',';

/// Score persisted on a `job_applications` row. Never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub score: f64,
}

impl SkillMatch {
    pub fn compute(candidate_skills: Option<&str>, job_skills: Option<&str>) -> Self {
        Self {
            score: skill_score(candidate_skills, job_skills),
        }
    }
}

/// Lowercased set of delimited values. Missing or empty input is the empty set.
pub fn skill_set(csv: Option<&str>) -> BTreeSet<String> {
    match csv {
        Some(s) if !s.is_empty() => s
            .to_lowercase()
            .split(SKILL_DELIMITER)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect(),
        _ => BTreeSet::new(),
    }
}

/// 100 × |candidate ∩ job| / |job|, or 0 when the job lists no skills.
pub fn skill_score(candidate_skills: Option<&str>, job_skills: Option<&str>) -> f64 {
    let job = skill_set(job_skills);
    if job.is_empty() {
        return 0.0;
    }
    let candidate = skill_set(candidate_skills);
    let matched = job.intersection(&candidate).count();
    100.0 * matched as f64 / job.len() as f64
}

//! Overlap scorer: live keyword match between a job posting and a candidate profile.
//!
//! Algorithm:
//! 1. job_tokens = tokenize(description + requirements)
//! 2. candidate_tokens = tokenize(skills + experience)
//! 3. score = 100 × |job ∩ candidate| / |job|   (0 when the job has no tokens)
//! 4. every matched token contributes 100 / |job| percentage points
//!
//! Step 4 is a share of the job's token set, not of the intersection, so the
//! contributions always add up to the score.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::matching::tokenizer::{TokenSet, Tokenizer};

/// A single matched token and the percentage points it adds to the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub token: String,
    pub percent: f64,
}

impl fmt::Display for Contribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1}%)", self.token, self.percent)
    }
}

/// Score in [0, 100] plus the per-token breakdown, sorted by token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: f64,
    pub contributions: Vec<Contribution>,
}

impl MatchResult {
    /// The "no data to match" result.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn matched_tokens(&self) -> impl Iterator<Item = &str> {
        self.contributions.iter().map(|c| c.token.as_str())
    }
}

/// Scorer seam. `AppState` carries one behind an `Arc<dyn MatchScorer>`.
pub trait MatchScorer: Send + Sync {
    /// Scores candidate text fields against job text fields.
    /// Fields are concatenated with a single space before tokenizing.
    fn score(&self, job_fields: &[&str], candidate_fields: &[&str]) -> MatchResult;
}

/// Default keyword-overlap scorer.
#[derive(Debug, Clone, Default)]
pub struct OverlapScorer {
    tokenizer: Tokenizer,
}

impl OverlapScorer {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }
}

impl MatchScorer for OverlapScorer {
    fn score(&self, job_fields: &[&str], candidate_fields: &[&str]) -> MatchResult {
        let job_tokens = self.tokenizer.tokenize_fields(job_fields);
        if job_tokens.is_empty() {
            return MatchResult::empty();
        }
        let candidate_tokens = self.tokenizer.tokenize_fields(candidate_fields);
        score_token_sets(&job_tokens, &candidate_tokens)
    }
}

/// Scores two already-normalized token sets.
pub fn score_token_sets(job_tokens: &TokenSet, candidate_tokens: &TokenSet) -> MatchResult {
    if job_tokens.is_empty() {
        return MatchResult::empty();
    }

    let job_len = job_tokens.len() as f64;
    let per_token = 100.0 / job_len;

    let contributions: Vec<Contribution> = job_tokens
        .intersection(candidate_tokens)
        .map(|token| Contribution {
            token: token.clone(),
            percent: per_token,
        })
        .collect();

    let score = 100.0 * contributions.len() as f64 / job_len;

    MatchResult {
        score,
        contributions,
    }
}

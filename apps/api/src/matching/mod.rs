//! Matching engine: tokenizing, overlap and skill-list scoring, ranking, stats.
//! Pure and synchronous. Persistence and HTTP live in `crate::portal`.

pub mod overlap;
pub mod ranking;
pub mod skills;
pub mod stats;
pub mod tokenizer;

use std::collections::HashSet;

use crate::matching::tokenizer::{english_stopwords, Tokenizer};

/// Jobs scoring strictly above this are surfaced as notifications.
pub const NOTIFICATION_THRESHOLD: f64 = 30.0;

/// Immutable engine configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub stopwords: HashSet<String>,
    pub notification_threshold: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            stopwords: english_stopwords(),
            notification_threshold: NOTIFICATION_THRESHOLD,
        }
    }
}

impl MatchConfig {
    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new(self.stopwords.clone())
    }
}

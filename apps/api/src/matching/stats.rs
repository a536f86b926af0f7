//! Aggregate stats over persisted application records.

use serde::{Deserialize, Serialize};

use crate::models::application::ApplicationMetrics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_jobs: u64,
    pub total_applications: u64,
    pub avg_match_score: f64,
    pub avg_parse_time: f64,
    pub avg_match_time: f64,
}

/// Builds a snapshot from the job count and every application's metrics.
///
/// Averages skip records where the value was never recorded and fall back to
/// 0 when nothing is left to average.
pub fn compute_stats(total_jobs: u64, records: &[ApplicationMetrics]) -> StatsSnapshot {
    StatsSnapshot {
        total_jobs,
        total_applications: records.len() as u64,
        avg_match_score: mean(records.iter().filter_map(|r| r.match_score)),
        avg_parse_time: mean(records.iter().filter_map(|r| r.resume_parse_time)),
        avg_match_time: mean(records.iter().filter_map(|r| r.match_calc_time)),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0u64), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

//! Run aggregation and summary report
//!
//! Only samples that made it through every stage contribute a score and a
//! latency. Medians are used rather than means so a few slow calls or a
//! miscalibrated judge answer do not dominate the result.

use chrono::{DateTime, Utc};
use std::time::Duration;
use uuid::Uuid;

use crate::error::Stage;
use crate::judge::ScoreResult;

/// Number of samples dropped at each stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub descriptor: usize,
    pub invocation: usize,
    pub judging: usize,
}

impl SkipCounts {
    pub fn record(&mut self, stage: Stage) {
        match stage {
            Stage::Descriptor => self.descriptor += 1,
            Stage::Invocation => self.invocation += 1,
            Stage::Judging => self.judging += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.descriptor + self.invocation + self.judging
    }
}

/// Accumulates per-sample results during a run.
#[derive(Debug, Clone)]
pub struct RunAggregator {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    discovered: usize,
    scores: Vec<u8>,
    latencies: Vec<f64>,
    skipped: SkipCounts,
}

impl Default for RunAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl RunAggregator {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            discovered: 0,
            scores: Vec::new(),
            latencies: Vec::new(),
            skipped: SkipCounts::default(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Count a descriptor handed to the pipeline.
    pub fn record_discovered(&mut self) {
        self.discovered += 1;
    }

    /// Record a sample that passed every stage.
    pub fn record_success(&mut self, score: ScoreResult, elapsed: Duration) {
        self.scores.push(score.value());
        self.latencies.push(elapsed.as_secs_f64());
    }

    pub fn record_skip(&mut self, stage: Stage) {
        self.skipped.record(stage);
    }

    /// Compute the summary. Never fails; with no successes both medians
    /// are `0.0`.
    pub fn finish(self) -> RunSummary {
        let score_values: Vec<f64> = self.scores.iter().map(|&s| f64::from(s)).collect();
        RunSummary {
            run_id: self.run_id,
            started_at: self.started_at,
            finished_at: Utc::now(),
            discovered: self.discovered,
            skipped: self.skipped,
            median_score: median(&score_values),
            median_latency: median(&self.latencies),
            scores: self.scores,
            latencies: self.latencies,
        }
    }
}

/// Final statistics of one run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Descriptors found in the corpus.
    pub discovered: usize,
    pub skipped: SkipCounts,
    /// Scores of successful samples, in processing order.
    pub scores: Vec<u8>,
    /// Subject latencies in seconds, aligned with `scores`.
    pub latencies: Vec<f64>,
    pub median_score: f64,
    /// Seconds.
    pub median_latency: f64,
}

impl RunSummary {
    pub fn scored(&self) -> usize {
        self.scores.len()
    }

    /// Format as a summary report
    pub fn format_report(&self) -> String {
        let mut report = String::new();

        report.push_str("# Evaluation Results\n\n");
        report.push_str(&format!("Run `{}`\n\n", self.run_id));

        report.push_str("## Summary\n\n");
        report.push_str(&format!(
            "| Metric | Value |\n\
             |--------|-------|\n\
             | Samples Discovered | {} |\n\
             | Scored | {} |\n\
             | Skipped | {} |\n\
             | Median Similarity Score | {:.1}/10 |\n\
             | Median Latency | {:.2}s |\n\n",
            self.discovered,
            self.scored(),
            self.skipped.total(),
            self.median_score,
            self.median_latency,
        ));

        if self.skipped.total() > 0 {
            report.push_str("## Skipped by Stage\n\n");
            report.push_str("| Stage | Samples |\n|-------|---------|\n");
            for (stage, count) in [
                (Stage::Descriptor, self.skipped.descriptor),
                (Stage::Invocation, self.skipped.invocation),
                (Stage::Judging, self.skipped.judging),
            ] {
                if count > 0 {
                    report.push_str(&format!("| {} | {} |\n", stage, count));
                }
            }
            report.push('\n');
        }

        let elapsed = self.finished_at - self.started_at;
        report.push_str(&format!(
            "Finished {} ({:.1}s wall clock)\n",
            self.finished_at.to_rfc3339(),
            elapsed.num_milliseconds() as f64 / 1000.0
        ));

        report
    }
}

/// Statistical median. Even-length input averages the two middle values;
/// empty input yields `0.0`.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

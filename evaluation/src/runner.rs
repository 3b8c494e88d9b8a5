//! Evaluation runner
//!
//! Drives one sequential pass over the corpus:
//!
//! ```text
//! descriptor → SampleRecord → SubjectService → Judge → RunAggregator
//! ```
//!
//! A failure at any stage ends that sample only: it is logged, reported as
//! a skip block, and the next descriptor is processed. Exactly one block is
//! written per descriptor, followed by the summary report.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::corpus::SampleRecord;
use crate::error::SkipReason;
use crate::judge::{Judge, ScoreResult};
use crate::report::{RunAggregator, RunSummary};
use crate::subject::{InvocationResult, SubjectService};

/// Result of pushing one descriptor through the pipeline.
#[derive(Debug, Clone)]
pub enum SampleOutcome {
    Scored {
        record: SampleRecord,
        invocation: InvocationResult,
        score: ScoreResult,
    },
    /// The subject answered but the judge failed. Both texts are kept so
    /// the block still shows what was compared.
    Unjudged {
        record: SampleRecord,
        invocation: InvocationResult,
        reason: SkipReason,
    },
    /// Dropped before the subject produced an answer.
    Skipped {
        descriptor: PathBuf,
        reason: SkipReason,
    },
}

impl SampleOutcome {
    pub fn descriptor(&self) -> &Path {
        match self {
            Self::Scored { record, .. } | Self::Unjudged { record, .. } => &record.descriptor,
            Self::Skipped { descriptor, .. } => descriptor,
        }
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, Self::Scored { .. })
    }

    /// Human-readable progress block for this sample.
    pub fn render(&self) -> String {
        let header = format!("--- Processing: {} ---", self.descriptor().display());
        let rule = "-".repeat(header.chars().count());
        match self {
            Self::Scored {
                record,
                invocation,
                score,
            } => format!(
                "{header}\n\n{}Similarity Score: {}/10\nElapsed: {:.2}s\n{rule}\n",
                compared_texts(record, invocation),
                score.value(),
                invocation.elapsed_secs(),
            ),
            Self::Unjudged {
                record,
                invocation,
                reason,
            } => format!(
                "{header}\n\n{}Skipped ({}): {}\nElapsed: {:.2}s\n{rule}\n",
                compared_texts(record, invocation),
                reason.stage,
                reason.message,
                invocation.elapsed_secs(),
            ),
            Self::Skipped { reason, .. } => {
                format!("{header}\nSkipped ({}): {}\n{rule}\n", reason.stage, reason.message)
            }
        }
    }
}

fn compared_texts(record: &SampleRecord, invocation: &InvocationResult) -> String {
    format!(
        "[Expected Response]\n{}\n\n[Actual Response]\n{}\n\n",
        record.expected_text.trim_end(),
        invocation.actual_text.trim_end(),
    )
}

/// Runs samples through a subject service and a judge.
pub struct EvaluationRunner<S, J> {
    subject: S,
    judge: J,
}

impl<S: SubjectService, J: Judge> EvaluationRunner<S, J> {
    pub fn new(subject: S, judge: J) -> Self {
        Self { subject, judge }
    }

    /// Evaluate a single descriptor. Never fails; failures become
    /// [`SampleOutcome::Skipped`] or [`SampleOutcome::Unjudged`].
    pub fn evaluate_sample(&self, descriptor: &Path) -> SampleOutcome {
        let log_skip = |reason: &SkipReason, sample_id: Option<&str>| {
            warn!(
                descriptor = %descriptor.display(),
                sample_id = sample_id.unwrap_or("-"),
                stage = %reason.stage,
                "Skipping sample: {}",
                reason.message
            );
        };
        let skipped = |reason: SkipReason, sample_id: Option<&str>| {
            log_skip(&reason, sample_id);
            SampleOutcome::Skipped {
                descriptor: descriptor.to_path_buf(),
                reason,
            }
        };

        let record = match SampleRecord::from_descriptor(descriptor) {
            Ok(record) => record,
            Err(e) => return skipped(e.into(), None),
        };

        let invocation = match self.subject.analyze(&record) {
            Ok(invocation) => invocation,
            Err(e) => return skipped(e.into(), Some(&record.sample_id)),
        };

        let score = match self
            .judge
            .score(&record.expected_text, &invocation.actual_text)
        {
            Ok(score) => score,
            Err(e) => {
                let reason = SkipReason::from(e);
                log_skip(&reason, Some(&record.sample_id));
                return SampleOutcome::Unjudged {
                    record,
                    invocation,
                    reason,
                };
            }
        };

        info!(
            sample_id = %record.sample_id,
            score = score.value(),
            elapsed_secs = invocation.elapsed_secs(),
            "Sample scored"
        );
        SampleOutcome::Scored {
            record,
            invocation,
            score,
        }
    }

    /// Evaluate every descriptor in order, writing one progress block per
    /// descriptor and the final report to `out`.
    pub fn run<I, W>(&self, descriptors: I, out: &mut W) -> io::Result<RunSummary>
    where
        I: IntoIterator<Item = PathBuf>,
        W: Write,
    {
        let mut aggregator = RunAggregator::new();
        info!(run_id = %aggregator.run_id(), "Evaluation run starting");

        for descriptor in descriptors {
            aggregator.record_discovered();
            let outcome = self.evaluate_sample(&descriptor);
            match &outcome {
                SampleOutcome::Scored {
                    invocation, score, ..
                } => aggregator.record_success(*score, invocation.elapsed),
                SampleOutcome::Unjudged { reason, .. } | SampleOutcome::Skipped { reason, .. } => {
                    aggregator.record_skip(reason.stage)
                }
            }
            writeln!(out, "{}", outcome.render())?;
        }

        let summary = aggregator.finish();
        write!(out, "{}", summary.format_report())?;
        out.flush()?;

        info!(
            run_id = %summary.run_id,
            discovered = summary.discovered,
            scored = summary.scored(),
            skipped = summary.skipped.total(),
            median_score = summary.median_score,
            median_latency = summary.median_latency,
            "Evaluation run finished"
        );
        Ok(summary)
    }
}

//! Explanation Evaluation Library
//!
//! Scores how closely a log-analysis service's explanations match
//! human-written ones, using a second LLM as the judge.
//!
//! # Pipeline
//!
//! ```text
//! corpus dir ─→ CorpusWalker ─→ SampleRecord ─→ SubjectService ─→ Judge ─→ RunAggregator
//!                (descriptors)    (issue,         (POST /analyze/   (score    (median score,
//!                                  log_file)       staged)           1..=10)   median latency)
//! ```
//!
//! Everything runs on the calling thread, one sample at a time, with
//! blocking HTTP calls. A failing sample is logged and skipped; only
//! samples that pass every stage reach the summary.
//!
//! # Example
//!
//! ```no_run
//! use evaluation::{
//!     ApiKey, ChatCompletionJudge, CorpusWalker, EvaluationRunner, HttpSubjectClient,
//!     JudgeConfig, SubjectConfig,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let walker = CorpusWalker::open("./samples")?;
//! let subject = HttpSubjectClient::new(SubjectConfig::new("http://localhost:8080"))?;
//! let judge = ChatCompletionJudge::new(JudgeConfig::new(
//!     "https://api.openai.com/v1",
//!     "gpt-4o-mini",
//!     ApiKey::from_file("judge.key")?,
//! ))?;
//!
//! let runner = EvaluationRunner::new(subject, judge);
//! let summary = runner.run(walker.descriptors(), &mut std::io::stdout())?;
//! println!("median score {:.1}", summary.median_score);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::uninlined_format_args)]

pub mod config;
pub mod corpus;
pub mod error;
pub mod judge;
pub mod report;
pub mod runner;
pub mod subject;

pub use config::{ApiKey, EvalConfig, JudgeConfig, SubjectConfig};
pub use corpus::{CorpusWalker, SampleRecord};
pub use error::{
    ConfigError, CorpusError, JudgeError, SampleError, SkipReason, Stage, SubjectError,
};
pub use judge::{ChatCompletionJudge, Judge, ScoreResult};
pub use report::{median, RunAggregator, RunSummary, SkipCounts};
pub use runner::{EvaluationRunner, SampleOutcome};
pub use subject::{HttpSubjectClient, InvocationResult, SubjectService};

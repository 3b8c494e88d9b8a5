//! Evaluation error types
//!
//! Every pipeline stage returns its own error enum. Fatal errors
//! (`CorpusError`, `ConfigError`) stop the run before any sample is
//! processed; the per-sample errors (`SampleError`, `SubjectError`,
//! `JudgeError`) are folded by the runner into a [`SkipReason`] and only
//! exclude the sample they belong to.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

// ============================================================================
// Fatal preconditions
// ============================================================================

/// Errors raised while opening the sample corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Corpus directory not found at '{}'", .0.display())]
    NotFound(PathBuf),

    #[error("Corpus path '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

/// Errors raised while resolving the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read credential file '{}': {source}", .path.display())]
    CredentialUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Credential file '{}' is empty", .0.display())]
    CredentialEmpty(PathBuf),

    #[error(transparent)]
    Corpus(#[from] CorpusError),
}

// ============================================================================
// Per-sample errors
// ============================================================================

/// Errors raised while turning a metadata descriptor into a sample record.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("Failed to read descriptor '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing YAML file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Descriptor '{}' is not a key/value mapping", .0.display())]
    NotAMapping(PathBuf),

    #[error("Descriptor '{}' is missing the '{field}' field", .path.display())]
    MissingField { path: PathBuf, field: &'static str },

    #[error("Descriptor '{}' has a non-scalar '{field}' field", .path.display())]
    UnsupportedValue { path: PathBuf, field: &'static str },

    #[error("Descriptor '{}' has no parent directory to name the sample", .0.display())]
    NoSampleDirectory(PathBuf),
}

/// Errors raised by the subject analysis service call.
#[derive(Debug, Error)]
pub enum SubjectError {
    #[error("Error calling API for {log_url}: {source}")]
    Transport {
        log_url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API call for {log_url} timed out after {timeout:?}")]
    Timeout { log_url: String, timeout: Duration },

    #[error("API returned HTTP {status} for {log_url}: {body}")]
    Status {
        log_url: String,
        status: u16,
        body: String,
    },

    #[error("Could not decode JSON from API response for {log_url}: {source}")]
    InvalidJson {
        log_url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not find 'explanation.text' in API response for {log_url}. Response: {response}")]
    MissingExplanation { log_url: String, response: String },
}

/// Errors raised by the judge LLM call and score validation.
#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("Judge API request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Failed to encode the score schema: {0}")]
    Schema(#[source] serde_json::Error),

    #[error("Judge API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed judge response: {0}")]
    MalformedResponse(String),

    #[error("Invalid response from LLM, content is not a string: {0}")]
    NonStringContent(serde_json::Value),

    #[error("Could not parse the score from the LLM response '{content}': {reason}")]
    SchemaViolation { content: String, reason: String },
}

// ============================================================================
// Skip reasons
// ============================================================================

/// Pipeline stage at which a sample dropped out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Reading or validating the metadata descriptor.
    Descriptor,
    /// Calling the subject analysis service.
    Invocation,
    /// Asking the judge LLM for a score.
    Judging,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Descriptor => write!(f, "descriptor"),
            Self::Invocation => write!(f, "invocation"),
            Self::Judging => write!(f, "judging"),
        }
    }
}

/// Why a sample was excluded from the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipReason {
    pub stage: Stage,
    pub message: String,
}

impl SkipReason {
    pub fn new(stage: Stage, error: &dyn std::error::Error) -> Self {
        Self {
            stage,
            message: error.to_string(),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.message)
    }
}

impl From<SampleError> for SkipReason {
    fn from(err: SampleError) -> Self {
        Self::new(Stage::Descriptor, &err)
    }
}

impl From<SubjectError> for SkipReason {
    fn from(err: SubjectError) -> Self {
        Self::new(Stage::Invocation, &err)
    }
}

impl From<JudgeError> for SkipReason {
    fn from(err: JudgeError) -> Self {
        Self::new(Stage::Judging, &err)
    }
}

/// Longest response body excerpt kept in error messages.
pub(crate) const BODY_EXCERPT_CHARS: usize = 500;

/// First [`BODY_EXCERPT_CHARS`] characters of an HTTP body, with `...`
/// appended when cut.
pub(crate) fn body_excerpt(body: &str) -> String {
    if body.chars().count() <= BODY_EXCERPT_CHARS {
        return body.to_string();
    }
    let mut cut: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
    cut.push_str("...");
    cut
}

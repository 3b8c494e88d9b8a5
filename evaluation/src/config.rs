//! Run configuration
//!
//! Resolved once at startup and immutable for the rest of the run.
//! Secrets are read from files into [`ApiKey`], which never prints its value.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::corpus::SampleRecord;
use crate::error::{ConfigError, CorpusError};

/// Public repository the sample logs are fetched from.
pub const DEFAULT_LOG_REPO_URL: &str =
    "https://raw.githubusercontent.com/fedora-copr/logdetective-sample/main/data/";

/// Subject service endpoint that analyzes a log by URL.
pub const ANALYZE_ENDPOINT: &str = "/analyze/staged";

pub const DEFAULT_SUBJECT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_JUDGE_TIMEOUT: Duration = Duration::from_secs(600);

/// A bearer token read from disk.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Read a key from `path`, trimming surrounding whitespace.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| {
            ConfigError::CredentialUnreadable {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let key = raw.trim();
        if key.is_empty() {
            return Err(ConfigError::CredentialEmpty(path.to_path_buf()));
        }
        Ok(Self(key.to_string()))
    }

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw token, for building an `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Join URL segments with exactly one `/` between them. Segments are not
/// re-encoded.
pub fn join_url(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        url.push('/');
        url.push_str(segment);
    }
    url
}

/// Subject analysis service settings.
#[derive(Debug, Clone)]
pub struct SubjectConfig {
    /// Base address of the service, e.g. `http://localhost:8080`.
    pub server_address: String,
    /// Bearer token, sent only when present.
    pub api_key: Option<ApiKey>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Base URL that sample log files are served from.
    pub log_repo_url: String,
}

impl SubjectConfig {
    pub fn new(server_address: impl Into<String>) -> Self {
        Self {
            server_address: server_address.into(),
            api_key: None,
            timeout: DEFAULT_SUBJECT_TIMEOUT,
            log_repo_url: DEFAULT_LOG_REPO_URL.to_string(),
        }
    }

    pub fn with_api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_log_repo_url(mut self, url: impl Into<String>) -> Self {
        self.log_repo_url = url.into();
        self
    }

    /// Full URL of the analyze endpoint.
    pub fn analyze_url(&self) -> String {
        join_url(&self.server_address, &[ANALYZE_ENDPOINT])
    }

    /// Public URL of the log file referenced by `record`.
    pub fn log_url(&self, record: &SampleRecord) -> String {
        join_url(&self.log_repo_url, &[&record.sample_id, &record.log_file])
    }
}

/// Judge LLM settings (OpenAI-compatible chat completions).
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    /// API base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub model: String,
    pub api_key: ApiKey,
    pub timeout: Duration,
}

impl JudgeConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: ApiKey) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key,
            timeout: DEFAULT_JUDGE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn completions_url(&self) -> String {
        join_url(&self.base_url, &["chat/completions"])
    }
}

/// Everything a run needs.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    pub corpus_dir: PathBuf,
    pub subject: SubjectConfig,
    pub judge: JudgeConfig,
}

impl EvalConfig {
    /// Check the fatal preconditions that do not involve the network.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.corpus_dir.exists() {
            return Err(CorpusError::NotFound(self.corpus_dir.clone()).into());
        }
        if !self.corpus_dir.is_dir() {
            return Err(CorpusError::NotADirectory(self.corpus_dir.clone()).into());
        }
        Ok(())
    }
}

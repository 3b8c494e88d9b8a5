//! Subject Invoker
//!
//! Calls the log-analysis service under evaluation, one blocking request
//! per sample:
//!
//! ```text
//! POST <server>/analyze/staged
//! Authorization: Bearer <key>      (only when a key is configured)
//! {"url": "<log_repo>/<sample_id>/<log_file>"}
//!
//! 200 {"explanation": {"text": "..."}, ...}
//! ```

use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::SubjectConfig;
use crate::corpus::SampleRecord;
use crate::error::{body_excerpt, SubjectError};

/// Outcome of a successful subject call.
#[derive(Debug, Clone)]
pub struct InvocationResult {
    /// The service's explanation, from `explanation.text`.
    pub actual_text: String,
    /// Wall-clock time from sending the request to reading the full body.
    pub elapsed: Duration,
    /// Full decoded response.
    pub raw_response: Value,
    /// Log URL that was submitted for analysis.
    pub log_url: String,
}

impl InvocationResult {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// A service that turns a sample's log into an explanation.
#[cfg_attr(test, mockall::automock)]
pub trait SubjectService {
    fn analyze(&self, record: &SampleRecord) -> Result<InvocationResult, SubjectError>;
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    url: &'a str,
}

/// HTTP client for the subject service.
pub struct HttpSubjectClient {
    config: SubjectConfig,
    http: reqwest::blocking::Client,
}

impl HttpSubjectClient {
    pub fn new(config: SubjectConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }
}

impl SubjectService for HttpSubjectClient {
    fn analyze(&self, record: &SampleRecord) -> Result<InvocationResult, SubjectError> {
        let log_url = self.config.log_url(record);
        let endpoint = self.config.analyze_url();
        debug!(%endpoint, %log_url, sample_id = %record.sample_id, "Calling subject service");

        let mut request = self
            .http
            .post(&endpoint)
            .json(&AnalyzeRequest { url: &log_url });
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key.expose());
        }

        let transport_error = |source: reqwest::Error| {
            if source.is_timeout() {
                SubjectError::Timeout {
                    log_url: log_url.clone(),
                    timeout: self.config.timeout,
                }
            } else {
                SubjectError::Transport {
                    log_url: log_url.clone(),
                    source,
                }
            }
        };

        let start = Instant::now();
        let response = request.send().map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SubjectError::Status {
                log_url,
                status: status.as_u16(),
                body: body_excerpt(&body),
            });
        }
        let body = response.text().map_err(transport_error)?;
        let elapsed = start.elapsed();

        let raw_response: Value =
            serde_json::from_str(&body).map_err(|source| SubjectError::InvalidJson {
                log_url: log_url.clone(),
                source,
            })?;
        let actual_text = match extract_explanation(&raw_response) {
            Some(text) => text.to_string(),
            None => {
                return Err(SubjectError::MissingExplanation {
                    log_url,
                    response: body_excerpt(&raw_response.to_string()),
                })
            }
        };

        debug!(elapsed_secs = elapsed.as_secs_f64(), "Subject service responded");
        Ok(InvocationResult {
            actual_text,
            elapsed,
            raw_response,
            log_url,
        })
    }
}

/// The explanation text at `explanation.text`, if it is a string.
pub fn extract_explanation(response: &Value) -> Option<&str> {
    response.get("explanation")?.get("text")?.as_str()
}

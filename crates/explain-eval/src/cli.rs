//! Command-line arguments

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use evaluation::config::{DEFAULT_JUDGE_TIMEOUT, DEFAULT_LOG_REPO_URL, DEFAULT_SUBJECT_TIMEOUT};
use evaluation::{ApiKey, ConfigError, EvalConfig, JudgeConfig, SubjectConfig};

/// Evaluate a log-analysis service by comparing its explanations with
/// expected ones, using an LLM as the judge.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// File containing the API key for the judge LLM
    pub judge_key_file: PathBuf,

    /// Directory containing the sample data
    pub data_directory: PathBuf,

    /// Base URL of the analysis service (e.g. http://localhost:8080)
    pub server_address: String,

    /// Base URL of the judge LLM API (e.g. https://api.openai.com/v1)
    pub llm_url: String,

    /// Name of the judge LLM model
    pub llm_model: String,

    /// Request timeout for the analysis service, in seconds
    #[arg(long, default_value_t = DEFAULT_SUBJECT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// File containing a bearer token for the analysis service
    #[arg(long)]
    pub subject_key_file: Option<PathBuf>,

    /// Base URL the sample log files are served from
    #[arg(long, default_value = DEFAULT_LOG_REPO_URL)]
    pub log_repo_url: String,

    /// Request timeout for the judge LLM, in seconds
    #[arg(long, default_value_t = DEFAULT_JUDGE_TIMEOUT.as_secs())]
    pub judge_timeout: u64,
}

impl Args {
    /// Read credentials and assemble the run configuration.
    pub fn into_config(self) -> Result<EvalConfig, ConfigError> {
        let judge_key = ApiKey::from_file(&self.judge_key_file)?;

        let mut subject = SubjectConfig::new(self.server_address)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_log_repo_url(self.log_repo_url);
        if let Some(path) = &self.subject_key_file {
            subject = subject.with_api_key(ApiKey::from_file(path)?);
        }

        let judge = JudgeConfig::new(self.llm_url, self.llm_model, judge_key)
            .with_timeout(Duration::from_secs(self.judge_timeout));

        Ok(EvalConfig {
            corpus_dir: self.data_directory,
            subject,
            judge,
        })
    }
}

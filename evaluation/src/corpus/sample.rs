//! Sample Record Builder
//!
//! Parses one `sample_metadata.yaml` descriptor into a [`SampleRecord`].

use serde_yaml::Value;
use std::path::{Path, PathBuf};

use crate::error::SampleError;

const ISSUE_KEY: &str = "issue";
const LOG_FILE_KEY: &str = "log_file";

/// One (expected explanation, log reference) pair under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRecord {
    /// Name of the directory holding the descriptor.
    pub sample_id: String,
    /// Human-authored explanation of the issue in the log.
    pub expected_text: String,
    /// Log file name, relative to the sample directory.
    pub log_file: String,
    /// Descriptor this record was built from.
    pub descriptor: PathBuf,
}

impl SampleRecord {
    /// Read and parse the descriptor at `path`.
    pub fn from_descriptor(path: impl AsRef<Path>) -> Result<Self, SampleError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SampleError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(path, &content)
    }

    /// Parse descriptor `content` as if it had been read from `path`.
    pub fn from_yaml(path: impl AsRef<Path>, content: &str) -> Result<Self, SampleError> {
        let path = path.as_ref();
        let metadata: Value = serde_yaml::from_str(content).map_err(|source| SampleError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if !metadata.is_mapping() {
            return Err(SampleError::NotAMapping(path.to_path_buf()));
        }

        let expected_text = required_text(&metadata, ISSUE_KEY, path)?;
        let log_file = required_text(&metadata, LOG_FILE_KEY, path)?;
        let sample_id = path
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| SampleError::NoSampleDirectory(path.to_path_buf()))?;

        Ok(Self {
            sample_id,
            expected_text,
            log_file,
            descriptor: path.to_path_buf(),
        })
    }
}

/// Fetch `key` as text. Absent, null, empty, blank, `false` and zero all
/// count as missing.
fn required_text(metadata: &Value, key: &'static str, path: &Path) -> Result<String, SampleError> {
    let missing = || SampleError::MissingField {
        path: path.to_path_buf(),
        field: key,
    };

    let text = match metadata.get(key) {
        None | Some(Value::Null) => return Err(missing()),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => {
            if !b {
                return Err(missing());
            }
            b.to_string()
        }
        Some(Value::Number(n)) => {
            if n.as_f64() == Some(0.0) {
                return Err(missing());
            }
            n.to_string()
        }
        Some(Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_)) => {
            return Err(SampleError::UnsupportedValue {
                path: path.to_path_buf(),
                field: key,
            })
        }
    };

    if text.trim().is_empty() {
        return Err(missing());
    }
    Ok(text)
}

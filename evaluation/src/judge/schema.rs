//! Similarity score schema
//!
//! The judge is asked to answer with a JSON object matching
//! [`SimilarityScore`]. The same type generates the JSON schema sent as the
//! `response_format` constraint and validates the reply, so the bound on the
//! score lives in one place.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::error::JudgeError;

pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 10;

/// Name the schema is registered under in the `response_format` block.
pub const SCHEMA_NAME: &str = "rated-snippet-analysis";

/// Wire format of the judge's answer.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SimilarityScore {
    /// The similarity score from 1 to 10.
    #[schemars(range(min = 1, max = 10))]
    pub score: i64,
}

impl SimilarityScore {
    /// Check the schema's bounds, which serde alone does not enforce.
    pub fn validate(&self) -> Result<ScoreResult, String> {
        ScoreResult::new(self.score)
            .ok_or_else(|| format!("score {} is outside {MIN_SCORE}..={MAX_SCORE}", self.score))
    }
}

/// A validated similarity score in `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScoreResult {
    score: u8,
}

impl ScoreResult {
    /// `None` when `value` is out of range. Never clamps.
    pub fn new(value: i64) -> Option<Self> {
        (MIN_SCORE..=MAX_SCORE)
            .contains(&value)
            .then(|| Self { score: value as u8 })
    }

    pub fn value(self) -> u8 {
        self.score
    }
}

/// JSON schema of [`SimilarityScore`].
pub fn score_schema() -> Result<Value, JudgeError> {
    let schema = schemars::schema_for!(SimilarityScore);
    serde_json::to_value(schema).map_err(JudgeError::Schema)
}

/// The `response_format` block for a chat completion request.
pub fn response_format() -> Result<Value, JudgeError> {
    Ok(serde_json::json!({
        "type": "json_schema",
        "json_schema": {
            "name": SCHEMA_NAME,
            "schema": score_schema()?,
        }
    }))
}

/// Parse and validate the message content returned by the judge.
pub fn parse_score(content: &str) -> Result<ScoreResult, JudgeError> {
    let violation = |reason: String| JudgeError::SchemaViolation {
        content: content.to_string(),
        reason,
    };
    let value: Value =
        serde_json::from_str(content.trim()).map_err(|e| violation(e.to_string()))?;
    if !value.is_object() {
        return Err(violation(format!("expected a JSON object, got {value}")));
    }
    let parsed: SimilarityScore =
        serde_json::from_value(value).map_err(|e| violation(e.to_string()))?;
    parsed.validate().map_err(violation)
}

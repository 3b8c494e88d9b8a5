//! Similarity Judge
//!
//! Asks an OpenAI-compatible chat completion endpoint to rate how close the
//! subject's explanation is to the expected one. The reply is constrained by
//! a JSON schema (`response_format: json_schema`) and validated again on
//! receipt; anything that does not fit the schema fails the sample. There
//! are no retries and no averaging over repeated calls.

pub mod prompt;
pub mod schema;

pub use schema::{parse_score, ScoreResult, SimilarityScore};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::JudgeConfig;
use crate::error::{body_excerpt, JudgeError};

/// Anything that can score expected vs. actual text.
#[cfg_attr(test, mockall::automock)]
pub trait Judge {
    fn score(&self, expected: &str, actual: &str) -> Result<ScoreResult, JudgeError>;
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Value,
}

/// Judge backed by a chat completion API.
pub struct ChatCompletionJudge {
    config: JudgeConfig,
    http: reqwest::blocking::Client,
}

impl ChatCompletionJudge {
    pub fn new(config: JudgeConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    fn request_body(&self, expected: &str, actual: &str) -> Result<ChatRequest<'_>, JudgeError> {
        Ok(ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompt::SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt::comparison_prompt(expected, actual),
                },
            ],
            temperature: 0.0,
            response_format: schema::response_format()?,
        })
    }
}

impl Judge for ChatCompletionJudge {
    fn score(&self, expected: &str, actual: &str) -> Result<ScoreResult, JudgeError> {
        let url = self.config.completions_url();
        debug!(%url, model = %self.config.model, "Requesting similarity score");

        let body = self.request_body(expected, actual)?;
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.config.api_key.expose())
            .json(&body)
            .send()
            .map_err(JudgeError::Transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(JudgeError::Api {
                status: status.as_u16(),
                body: body_excerpt(&body),
            });
        }

        let body = response.text().map_err(JudgeError::Transport)?;
        content_score(&body)
    }
}

/// Pull the first choice's content out of a chat completion body and
/// validate it as a [`SimilarityScore`].
pub fn content_score(body: &str) -> Result<ScoreResult, JudgeError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| JudgeError::MalformedResponse(format!("{e}: {body}")))?;
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| JudgeError::MalformedResponse("no choices in response".to_string()))?;

    match choice.message.content {
        Value::String(content) => parse_score(&content),
        other => Err(JudgeError::NonStringContent(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiKey;
    use serde_json::json;

    fn completion(content: Value) -> String {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}]
        })
        .to_string()
    }

    #[test]
    fn test_content_score_valid() {
        let body = completion(json!(r#"{"score": 9}"#));
        assert_eq!(content_score(&body).unwrap().value(), 9);
    }

    #[test]
    fn test_content_score_out_of_range() {
        let body = completion(json!(r#"{"score": 15}"#));
        assert!(matches!(
            content_score(&body),
            Err(JudgeError::SchemaViolation { .. })
        ));
    }

    #[test]
    fn test_content_score_non_string_content() {
        for content in [json!(null), json!({"score": 9}), json!(9)] {
            assert!(matches!(
                content_score(&completion(content)),
                Err(JudgeError::NonStringContent(_))
            ));
        }
    }

    #[test]
    fn test_content_score_missing_content_is_non_string() {
        let body = json!({"choices": [{"message": {"role": "assistant", "refusal": "no"}}]}).to_string();
        assert!(matches!(
            content_score(&body),
            Err(JudgeError::NonStringContent(Value::Null))
        ));
    }

    #[test]
    fn test_content_score_no_choices() {
        let body = json!({"choices": []}).to_string();
        assert!(matches!(
            content_score(&body),
            Err(JudgeError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_content_score_not_json() {
        assert!(matches!(
            content_score("<html>bad gateway</html>"),
            Err(JudgeError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let judge = ChatCompletionJudge::new(JudgeConfig::new(
            "http://localhost:1/v1",
            "judge-model",
            ApiKey::new("k"),
        ))
        .unwrap();
        let body = serde_json::to_value(judge.request_body("exp", "act").unwrap()).unwrap();

        assert_eq!(body["model"], "judge-model");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert!(body["messages"][1]["content"].as_str().unwrap().contains("exp"));
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(
            body["response_format"]["json_schema"]["name"],
            schema::SCHEMA_NAME
        );
    }
}

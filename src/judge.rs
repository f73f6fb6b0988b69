//! LLM-as-judge.

use crate::config::LlmConfig;
use crate::error::{EvalError, Result};
use crate::llm::LlmClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Raw grade returned by the judge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Score on a 0-10 scale.
    pub score: f64,
    /// Justification for the score.
    #[serde(default)]
    pub reason: String,
}

impl Verdict {
    pub fn new(score: f64, reason: impl Into<String>) -> Self {
        Self {
            score,
            reason: reason.into(),
        }
    }
}

/// Grades a rendered evaluation prompt.
#[async_trait]
pub trait Judge: Send + Sync {
    /// Ask `model` to grade `prompt`.
    async fn judge(&self, model: &str, prompt: &str) -> Result<Verdict>;
}

/// Judge backed by an OpenAI-compatible chat endpoint.
pub struct LlmJudge {
    client: LlmClient,
}

impl LlmJudge {
    /// Create a new judge with the given LLM client.
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    /// Create from LLM config, forcing deterministic sampling.
    pub fn from_config(mut config: LlmConfig) -> Self {
        config.temperature = 0.0;
        Self::new(LlmClient::new(config))
    }

    /// Parse judge response JSON.
    fn parse_verdict(response: &str) -> Result<Verdict> {
        let json_str = extract_json(response);

        let verdict: Verdict = serde_json::from_str(json_str).map_err(|e| {
            EvalError::LlmParse(format!(
                "Failed to parse judge response: {}. Response: {}",
                e, response
            ))
        })?;

        if !verdict.score.is_finite() {
            return Err(EvalError::LlmParse(format!(
                "Judge returned a non-finite score. Response: {}",
                response
            )));
        }

        Ok(verdict)
    }
}

#[async_trait]
impl Judge for LlmJudge {
    async fn judge(&self, model: &str, prompt: &str) -> Result<Verdict> {
        let response = self.client.with_model(model).complete(None, prompt).await?;
        Self::parse_verdict(&response)
    }
}

/// Extract a JSON object from a response that may be wrapped in a code
/// fence or surrounded by prose.
fn extract_json(response: &str) -> &str {
    let response = response.trim();

    if let Some(rest) = response.strip_prefix("```") {
        let body = rest.find('\n').map(|n| &rest[n + 1..]).unwrap_or(rest);
        if let Some(end) = body.rfind("```") {
            return body[..end].trim();
        }
    }

    if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) {
        if end > start {
            return &response[start..=end];
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_plain_json() {
        let verdict =
            LlmJudge::parse_verdict(r#"{"score": 10, "reason": "Same answer."}"#).unwrap();
        assert_eq!(verdict, Verdict::new(10.0, "Same answer."));
    }

    #[test]
    fn test_parse_fenced_json() {
        let response = "```json\n{\"score\": 2.5, \"reason\": \"Mostly wrong\"}\n```";
        let verdict = LlmJudge::parse_verdict(response).unwrap();
        assert_eq!(verdict.score, 2.5);
        assert_eq!(verdict.reason, "Mostly wrong");
    }

    #[test]
    fn test_parse_json_with_prose() {
        let response = "Here is my grade: {\"score\": 0, \"reason\": \"Lyon is not Paris\"} Thanks.";
        let verdict = LlmJudge::parse_verdict(response).unwrap();
        assert_eq!(verdict.score, 0.0);
    }

    #[test]
    fn test_missing_reason_defaults_to_empty() {
        let verdict = LlmJudge::parse_verdict(r#"{"score": 7}"#).unwrap();
        assert!(verdict.reason.is_empty());
    }

    #[test]
    fn test_unparseable_response() {
        let result = LlmJudge::parse_verdict("I think it is correct.");
        assert!(matches!(result, Err(EvalError::LlmParse(_))));
    }

    #[tokio::test]
    async fn test_judge_uses_requested_model() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "model": "judge-model", "temperature": 0.0 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": {
                    "role": "assistant",
                    "content": "{\"score\": 9, \"reason\": \"Equivalent\"}"
                } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let judge = LlmJudge::from_config(LlmConfig {
            api_base: server.uri(),
            api_key: "test-key".to_string(),
            model: "default-model".to_string(),
            ..Default::default()
        });

        let verdict = judge.judge("judge-model", "grade this").await.unwrap();
        assert_eq!(verdict, Verdict::new(9.0, "Equivalent"));
    }
}

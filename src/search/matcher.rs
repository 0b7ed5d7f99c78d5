//! Natural-language matcher client.
//!
//! Talks to an OpenAI-compatible chat completions endpoint (Gemini by default) and
//! asks for a JSON object constrained by the [`MatcherResponse`] schema.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

/// Matcher client errors. None of these leave the search module.
#[derive(Debug, Error)]
pub enum MatcherError {
    /// Client could not be constructed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection failed or timed out
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("API error: {0}")]
    Api(String),

    /// Response did not have the expected structure
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Event as shown to the matcher.
#[derive(Debug, Clone, Serialize)]
pub struct EventCandidate {
    pub id: String,
    pub title: String,
    pub desc: String,
    pub category: String,
    pub district: String,
    pub date: String,
}

/// Help offer as shown to the matcher.
#[derive(Debug, Clone, Serialize)]
pub struct HelpCandidate {
    pub id: String,
    pub org: String,
    #[serde(rename = "type")]
    pub help_type: String,
    pub desc: String,
    pub district: String,
}

/// The candidate set sent along with a query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchCandidates {
    pub events: Vec<EventCandidate>,
    pub help: Vec<HelpCandidate>,
}

/// What the matcher must answer with.
#[derive(Debug, Clone, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatcherResponse {
    pub relevant_event_ids: Vec<String>,
    pub relevant_help_ids: Vec<String>,
    /// A short, encouraging message in Russian explaining the choice.
    pub reasoning: String,
}

/// External matcher: query plus candidates in, relevant id subsets out.
#[async_trait]
pub trait Matcher: Send + Sync {
    async fn find_matches(
        &self,
        query: &str,
        candidates: &MatchCandidates,
    ) -> Result<MatcherResponse, MatcherError>;
}

/// Matcher backed by an LLM chat completions API.
#[derive(Clone)]
pub struct LlmMatcher {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl LlmMatcher {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MatcherError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MatcherError::Config(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    /// Build from configuration. Returns `None` when no API key is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>, MatcherError> {
        let Some(api_key) = config.matcher_api_key.clone() else {
            return Ok(None);
        };

        Self::new(
            api_key,
            config.matcher_base_url.clone(),
            config.matcher_model.clone(),
            config.http_timeout,
        )
        .map(Some)
    }

    fn prompt(query: &str, candidates: &MatchCandidates) -> Result<String, MatcherError> {
        let context = serde_json::to_string(candidates)
            .map_err(|e| MatcherError::Parse(format!("Failed to serialize candidates: {}", e)))?;

        Ok(format!(
            "You help people with disabilities in Moscow find accessible events and help services.\n\
             Current directory of events and help services:\n{context}\n\n\
             The user asks: \"{query}\"\n\n\
             Pick the IDs of the items that best match the need. Treat synonyms generously \
             (\"fun\" means events, \"lawyer\" means legal help, \"wheelchair repair\" means household help). \
             Answer with a JSON object holding both ID lists and a short reasoning message in Russian."
        ))
    }

    fn response_schema() -> serde_json::Value {
        let mut schema = serde_json::to_value(schema_for!(MatcherResponse)).unwrap_or_default();
        if let serde_json::Value::Object(map) = &mut schema {
            map.remove("$schema");
        }
        schema
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    choices: Vec<ChoiceRaw>,
}

#[derive(Debug, Deserialize)]
struct ChoiceRaw {
    message: ChoiceMessageRaw,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessageRaw {
    content: Option<String>,
}

#[async_trait]
impl Matcher for LlmMatcher {
    async fn find_matches(
        &self,
        query: &str,
        candidates: &MatchCandidates,
    ) -> Result<MatcherResponse, MatcherError> {
        let start = std::time::Instant::now();

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": Self::prompt(query, candidates)? }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "match_result",
                    "schema": Self::response_schema()
                }
            }
        });

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Matcher request failed");
                MatcherError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Matcher API error");
            return Err(MatcherError::Api(format!("{}: {}", status, error_text)));
        }

        let raw: ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| MatcherError::Parse(e.to_string()))?;

        let content = raw
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| MatcherError::Parse("Empty response from matcher".into()))?;

        debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis(),
            "Matcher completion"
        );

        serde_json::from_str(&content)
            .map_err(|e| MatcherError::Parse(format!("Malformed matcher response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn matcher(server: &MockServer) -> LlmMatcher {
        LlmMatcher::new("test-key", server.uri(), "test-model", Duration::from_secs(5)).unwrap()
    }

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
    }

    #[test]
    fn test_schema_lists_all_fields() {
        let schema = LlmMatcher::response_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 3);
        assert!(schema.get("$schema").is_none());
    }

    #[tokio::test]
    async fn test_find_matches_parses_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(
                r#"{"relevantEventIds":[],"relevantHelpIds":["h5"],"reasoning":"Ремонт колясок"}"#,
            )))
            .mount(&server)
            .await;

        let result = matcher(&server)
            .find_matches("коляска", &MatchCandidates::default())
            .await
            .unwrap();

        assert_eq!(result.relevant_help_ids, vec!["h5"]);
        assert!(result.relevant_event_ids.is_empty());
    }

    #[tokio::test]
    async fn test_find_matches_rejects_malformed_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion(r#"{"relevantEventIds":["e1"]}"#)),
            )
            .mount(&server)
            .await;

        let err = matcher(&server)
            .find_matches("театр", &MatchCandidates::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MatcherError::Parse(_)));
    }

    #[tokio::test]
    async fn test_find_matches_reports_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
            .mount(&server)
            .await;

        let err = matcher(&server)
            .find_matches("юрист", &MatchCandidates::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MatcherError::Api(_)));
    }
}

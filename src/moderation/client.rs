//! Client for an OpenAI-compatible moderation endpoint.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::config::DEFAULT_MODERATION_ENDPOINT;

/// Moderation client errors.
#[derive(Error, Debug)]
pub enum ModerationError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("API error (status {0}): {1}")]
    ApiError(u16, String),
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Configuration for the moderation endpoint.
#[derive(Debug, Clone)]
pub struct ModerationConfig {
    /// Full URL of the moderation endpoint.
    pub endpoint: String,
    pub api_key: String,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_MODERATION_ENDPOINT.to_string(),
            api_key: String::new(),
        }
    }
}

impl ModerationConfig {
    /// Set the moderation endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the API key sent as a bearer token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }
}

/// Judgment for a single piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModerationVerdict {
    pub flagged: bool,
    /// Category names the service marked as violated, sorted.
    pub categories: Vec<String>,
}

impl ModerationVerdict {
    /// Verdict for text the service did not flag.
    pub fn clean() -> Self {
        Self::default()
    }

    /// Verdict for flagged text with the given categories.
    pub fn flagged<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut categories: Vec<String> = categories.into_iter().map(Into::into).collect();
        categories.sort();
        Self {
            flagged: true,
            categories,
        }
    }
}

/// Anything that can classify text as flagged or not.
#[async_trait]
pub trait ModerationService: Send + Sync {
    /// Classify `input`.
    async fn moderate(&self, input: &str) -> Result<ModerationVerdict, ModerationError>;
}

#[derive(Debug, Deserialize)]
struct ModerationResponse {
    results: Vec<ModerationResult>,
}

#[derive(Debug, Deserialize)]
struct ModerationResult {
    flagged: bool,
    #[serde(default)]
    categories: HashMap<String, bool>,
}

/// Client for an OpenAI-compatible moderation endpoint.
pub struct ModerationClient {
    config: ModerationConfig,
    client: Client,
}

impl ModerationClient {
    /// Create a new ModerationClient with the given configuration.
    pub fn new(config: ModerationConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &ModerationConfig {
        &self.config
    }

    /// Send `input` to the moderation endpoint and return the first result.
    pub async fn request(&self, input: &str) -> Result<ModerationVerdict, ModerationError> {
        let body = json!({ "input": input });

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ModerationError::ApiError(status.as_u16(), text));
        }

        Self::parse_verdict(&text)
    }

    fn parse_verdict(body: &str) -> Result<ModerationVerdict, ModerationError> {
        let parsed: ModerationResponse =
            serde_json::from_str(body).map_err(|e| ModerationError::ParseError(e.to_string()))?;

        let result = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ModerationError::ParseError("No results in response".to_string()))?;

        if !result.flagged {
            return Ok(ModerationVerdict::clean());
        }

        Ok(ModerationVerdict::flagged(
            result
                .categories
                .into_iter()
                .filter(|(_, hit)| *hit)
                .map(|(name, _)| name),
        ))
    }
}

#[async_trait]
impl ModerationService for ModerationClient {
    async fn moderate(&self, input: &str) -> Result<ModerationVerdict, ModerationError> {
        self.request(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moderation_config_default() {
        let config = ModerationConfig::default();
        assert_eq!(config.endpoint, "https://api.openai.com/v1/moderations");
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_parse_verdict_unflagged() {
        let body = r#"{"id":"modr-1","model":"omni-moderation-latest",
            "results":[{"flagged":false,"categories":{"hate":false,"violence":false}}]}"#;
        let verdict = ModerationClient::parse_verdict(body).unwrap();
        assert_eq!(verdict, ModerationVerdict::clean());
    }

    #[test]
    fn test_parse_verdict_flagged_collects_categories() {
        let body = r#"{"results":[{"flagged":true,
            "categories":{"violence":true,"hate":false,"harassment":true}}]}"#;
        let verdict = ModerationClient::parse_verdict(body).unwrap();
        assert!(verdict.flagged);
        assert_eq!(verdict.categories, vec!["harassment", "violence"]);
    }

    #[test]
    fn test_parse_verdict_without_categories() {
        let verdict = ModerationClient::parse_verdict(r#"{"results":[{"flagged":true}]}"#).unwrap();
        assert!(verdict.flagged);
        assert!(verdict.categories.is_empty());
    }

    #[test]
    fn test_parse_verdict_empty_results() {
        let err = ModerationClient::parse_verdict(r#"{"results":[]}"#).unwrap_err();
        assert!(matches!(err, ModerationError::ParseError(_)));
    }

    #[test]
    fn test_parse_verdict_missing_flagged() {
        let err = ModerationClient::parse_verdict(r#"{"results":[{"categories":{}}]}"#).unwrap_err();
        assert!(matches!(err, ModerationError::ParseError(_)));
    }
}

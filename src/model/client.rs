//! Model client for chat completions using an OpenAI-compatible API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::{DEFAULT_COMPLETION_ENDPOINT, DEFAULT_MODEL};

/// Model client errors.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("API error (status {0}): {1}")]
    ApiError(u16, String),
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Configuration for the completion model.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Full URL of the chat completion endpoint.
    pub endpoint: String,
    pub api_key: String,
    pub model_name: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_COMPLETION_ENDPOINT.to_string(),
            api_key: String::new(),
            model_name: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ModelConfig {
    /// Set the completion endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the API key sent as a bearer token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the model name.
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }
}

/// Anything that can turn a message list into a single completion text.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Request a completion for `messages` and return the first choice's text.
    async fn complete(&self, messages: &[Value]) -> Result<String, ModelError>;
}

/// OpenAI API response structures.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completion endpoint.
pub struct ModelClient {
    config: ModelConfig,
    client: Client,
}

impl ModelClient {
    /// Create a new ModelClient with the given configuration.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Send a single completion request.
    ///
    /// # Arguments
    /// * `messages` - List of messages in OpenAI format.
    ///
    /// # Returns
    /// The content of the first choice.
    pub async fn request(&self, messages: &[Value]) -> Result<String, ModelError> {
        let body = json!({
            "model": self.config.model_name,
            "messages": messages,
        });

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
            return Err(ModelError::ApiError(status.as_u16(), text));
        }

        Self::parse_completion(&text)
    }

    /// Extract the first choice's content from a raw completion body.
    fn parse_completion(body: &str) -> Result<String, ModelError> {
        let completion: ChatCompletionResponse =
            serde_json::from_str(body).map_err(|e| ModelError::ParseError(e.to_string()))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::ParseError("No choices in response".to_string()))?;

        choice
            .message
            .content
            .ok_or_else(|| ModelError::ParseError("First choice has no content".to_string()))
    }
}

#[async_trait]
impl CompletionService for ModelClient {
    async fn complete(&self, messages: &[Value]) -> Result<String, ModelError> {
        self.request(messages).await
    }
}

/// Helper for building conversation messages.
pub struct MessageBuilder;

impl MessageBuilder {
    /// Create a system message.
    pub fn create_system_message(content: &str) -> Value {
        json!({
            "role": "system",
            "content": content
        })
    }

    /// Create a user message.
    pub fn create_user_message(content: &str) -> Value {
        json!({
            "role": "user",
            "content": content
        })
    }

    /// Build the two-message envelope sent for every generation.
    pub fn build_envelope(system_prompt: &str, user_query: &str) -> Vec<Value> {
        vec![
            Self::create_system_message(system_prompt),
            Self::create_user_message(user_query),
        ]
    }
}

//! Moderation-screened completion client.

use std::fmt;

use tracing::{debug, warn};

use crate::config::{DEFAULT_MAX_ATTEMPTS, DEFAULT_SYSTEM_PROMPT};
use crate::model::{CompletionService, MessageBuilder, ModelClient, ModelConfig};
use crate::moderation::{ModerationClient, ModerationConfig, ModerationService};

/// Configuration for the moderated chat loop.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// System prompt sent ahead of every user query.
    pub system_prompt: String,
    /// Maximum number of generations per `chat` call. Values below 1 are treated as 1.
    pub max_attempts: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl ChatConfig {
    /// Set a custom system prompt.
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Set the attempt budget.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }
}

/// Why a reply is a fallback instead of a generated answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The completion service failed or replied with something unusable.
    ServiceUnavailable,
    /// Every candidate within the attempt budget failed moderation.
    NoSuitableResponse,
}

impl FallbackReason {
    /// User-facing text for this fallback.
    pub fn message(&self) -> &'static str {
        match self {
            FallbackReason::ServiceUnavailable => {
                "Sorry, I am unable to process your request at the moment."
            }
            FallbackReason::NoSuitableResponse => {
                "Sorry, I am unable to provide a suitable response at the moment."
            }
        }
    }
}

/// Outcome of a generation or a full chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    Answer(String),
    Fallback(FallbackReason),
}

impl ChatReply {
    /// Text shown to the user.
    pub fn text(&self) -> &str {
        match self {
            ChatReply::Answer(text) => text.as_str(),
            ChatReply::Fallback(reason) => reason.message(),
        }
    }

    pub fn is_answer(&self) -> bool {
        matches!(self, ChatReply::Answer(_))
    }

    pub fn into_text(self) -> String {
        match self {
            ChatReply::Answer(text) => text,
            ChatReply::Fallback(reason) => reason.message().to_string(),
        }
    }
}

impl fmt::Display for ChatReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Chat client that screens every completion through a moderation service
/// and regenerates flagged candidates until the attempt budget runs out.
///
/// Remote failures never surface as errors: a failed completion becomes
/// [`FallbackReason::ServiceUnavailable`], and a failed moderation call
/// counts as a rejection.
///
/// # Example
///
/// ```rust,no_run
/// use moderated_chat::{ChatConfig, ModelConfig, ModeratedCompletionClient, ModerationConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let client = ModeratedCompletionClient::openai(
///         ModelConfig::default().with_api_key("sk-..."),
///         ModerationConfig::default().with_api_key("sk-..."),
///         ChatConfig::default(),
///     );
///
///     let reply = client.chat("Where is my order?").await;
///     println!("SUPPORT: {}", reply);
/// }
/// ```
pub struct ModeratedCompletionClient<C = ModelClient, M = ModerationClient> {
    completion: C,
    moderation: M,
    config: ChatConfig,
}

impl ModeratedCompletionClient<ModelClient, ModerationClient> {
    /// Create a client backed by the HTTP completion and moderation clients.
    pub fn openai(
        model_config: ModelConfig,
        moderation_config: ModerationConfig,
        chat_config: ChatConfig,
    ) -> Self {
        Self::new(
            ModelClient::new(model_config),
            ModerationClient::new(moderation_config),
            chat_config,
        )
    }
}

impl<C, M> ModeratedCompletionClient<C, M>
where
    C: CompletionService,
    M: ModerationService,
{
    pub fn new(completion: C, moderation: M, mut config: ChatConfig) -> Self {
        config.max_attempts = config.max_attempts.max(1);
        Self {
            completion,
            moderation,
            config,
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn completion(&self) -> &C {
        &self.completion
    }

    pub fn moderation(&self) -> &M {
        &self.moderation
    }

    /// Generate one candidate for `user_query`.
    ///
    /// Returns [`FallbackReason::ServiceUnavailable`] on any completion failure.
    pub async fn generate(&self, user_query: &str) -> ChatReply {
        let messages = MessageBuilder::build_envelope(&self.config.system_prompt, user_query);

        match self.completion.complete(&messages).await {
            Ok(text) => ChatReply::Answer(text),
            Err(e) => {
                warn!("Completion failed: {}", e);
                ChatReply::Fallback(FallbackReason::ServiceUnavailable)
            }
        }
    }

    /// Whether `text` is appropriate to show. Fails closed.
    pub async fn moderate(&self, text: &str) -> bool {
        match self.moderation.moderate(text).await {
            Ok(verdict) if verdict.flagged => {
                warn!(categories = ?verdict.categories, "Candidate flagged by moderation");
                false
            }
            Ok(_) => true,
            Err(e) => {
                warn!("Moderation failed, rejecting candidate: {}", e);
                false
            }
        }
    }

    /// Answer `user_query`, regenerating flagged candidates.
    ///
    /// Issues at most `max_attempts` completion calls and as many moderation
    /// calls. Each regeneration resends the original query unchanged.
    pub async fn chat(&self, user_query: &str) -> ChatReply {
        let max_attempts = self.config.max_attempts;
        let mut attempt = 1;
        let mut reply = self.generate(user_query).await;

        while !self.moderate(reply.text()).await {
            if attempt >= max_attempts {
                warn!(attempts = attempt, "No candidate passed moderation");
                return ChatReply::Fallback(FallbackReason::NoSuitableResponse);
            }
            attempt += 1;
            debug!(attempt, max_attempts, "Regenerating rejected candidate");
            reply = self.generate(user_query).await;
        }

        debug!(attempt, answer = reply.is_answer(), "Candidate accepted");
        reply
    }
}

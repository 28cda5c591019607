// Copyright 2025 The moderated-chat Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Moderated Chat
//!
//! Customer-service chat client that screens LLM completions through a
//! moderation endpoint before showing them.
//!
//! Every turn sends the configured system prompt and the user's query to an
//! OpenAI-compatible chat completion endpoint, then runs the answer through an
//! OpenAI-compatible moderation endpoint. Flagged answers are regenerated
//! until the attempt budget runs out, after which a fixed fallback is returned.
//!
//! ## Example
//!
//! ```rust,no_run
//! use moderated_chat::{AppSettings, ModeratedCompletionClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = AppSettings::load().with_env();
//!
//!     let client = ModeratedCompletionClient::openai(
//!         settings.model_config(),
//!         settings.moderation_config(),
//!         settings.chat_config(),
//!     );
//!
//!     let reply = client.chat("How do I reset my password?").await;
//!     if !reply.is_answer() {
//!         eprintln!("degraded reply");
//!     }
//!     println!("SUPPORT: {}", reply);
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod config;
pub mod console;
pub mod model;
pub mod moderation;
pub mod settings;

pub use chat::{ChatConfig, ChatReply, FallbackReason, ModeratedCompletionClient};
pub use model::{CompletionService, ModelClient, ModelConfig, ModelError};
pub use moderation::{
    ModerationClient, ModerationConfig, ModerationError, ModerationService, ModerationVerdict,
};
pub use settings::AppSettings;

//! Model client module for chat completions.

mod client;

pub use client::{CompletionService, MessageBuilder, ModelClient, ModelConfig, ModelError};

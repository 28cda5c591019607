//! Configuration defaults for the chat client.

mod prompts;

pub use prompts::{
    DEFAULT_COMPLETION_ENDPOINT, DEFAULT_MAX_ATTEMPTS, DEFAULT_MODEL, DEFAULT_MODERATION_ENDPOINT,
    DEFAULT_SYSTEM_PROMPT,
};

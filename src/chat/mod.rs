//! Chat module: the moderated completion loop.

mod moderated;

pub use moderated::{ChatConfig, ChatReply, FallbackReason, ModeratedCompletionClient};

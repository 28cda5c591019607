//! Default prompt and endpoint values.

/// Default system prompt for customer-service conversations.
pub static DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant to handle \
common customer service inquiries. \
The response should be user-friendly \
and aligns with typical customer \
service etiquette";

/// Default chat completion endpoint.
pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default moderation endpoint.
pub const DEFAULT_MODERATION_ENDPOINT: &str = "https://api.openai.com/v1/moderations";

/// Default completion model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default number of generation attempts before giving up on moderation.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_is_single_paragraph() {
        assert!(DEFAULT_SYSTEM_PROMPT.starts_with("You are a helpful assistant"));
        assert!(DEFAULT_SYSTEM_PROMPT.ends_with("service etiquette"));
        assert!(!DEFAULT_SYSTEM_PROMPT.contains('\n'));
        assert!(!DEFAULT_SYSTEM_PROMPT.contains("  "));
    }
}

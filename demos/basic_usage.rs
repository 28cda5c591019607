//! Basic usage example for Moderated Chat.

use moderated_chat::{ChatConfig, ChatReply, ModelConfig, ModeratedCompletionClient, ModerationConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt::init();

    let api_key = std::env::var("OPENAI_API_KEY")?;

    // Both endpoints share one key; point them elsewhere for compatible servers
    let model_config = ModelConfig::default()
        .with_api_key(&api_key)
        .with_model_name("gpt-3.5-turbo");
    let moderation_config = ModerationConfig::default().with_api_key(&api_key);

    let chat_config = ChatConfig::default().with_max_attempts(5);

    let client = ModeratedCompletionClient::openai(model_config, moderation_config, chat_config);

    let query = "My package arrived damaged. What should I do?";
    println!("USER: {}\n", query);

    match client.chat(query).await {
        ChatReply::Answer(text) => println!("SUPPORT: {}", text),
        ChatReply::Fallback(reason) => {
            eprintln!("Fallback ({:?})", reason);
            println!("SUPPORT: {}", reason.message());
        }
    }

    Ok(())
}

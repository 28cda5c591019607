//! Moderated Chat - single-turn customer-service chat
//!
//! This is the CLI entry point for the moderated-chat tool.
//! Run with: cargo run --bin moderated-chat -- --api-key sk-...

use anyhow::{bail, Result};
use clap::Parser;
use std::io::{self, Write};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use moderated_chat::console::{format_output, read_query};
use moderated_chat::settings::ENV_API_KEY;
use moderated_chat::{AppSettings, ModeratedCompletionClient};

#[derive(Parser)]
#[command(name = "moderated-chat")]
#[command(author, version, about = "OpenAI chat client with moderation screening", long_about = None)]
struct Cli {
    /// OpenAI API key
    #[arg(long, alias = "api_key")]
    api_key: Option<String>,

    /// Chat completion endpoint
    #[arg(long, alias = "api_endpoint")]
    api_endpoint: Option<String>,

    /// Moderation endpoint
    #[arg(long, alias = "moderation_endpoint")]
    moderation_endpoint: Option<String>,

    /// Completion model name
    #[arg(long)]
    model: Option<String>,

    /// Generation attempts before giving up on moderation
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_attempts: Option<u32>,

    /// System prompt sent with the query
    #[arg(long)]
    system_prompt: Option<String>,

    /// Persist the effective settings (flags, environment, settings file)
    #[arg(long)]
    save_settings: bool,

    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Apply command-line flags on top of `settings`.
    fn apply(&self, mut settings: AppSettings) -> AppSettings {
        if let Some(ref v) = self.api_key {
            settings.api_key = v.clone();
        }
        if let Some(ref v) = self.api_endpoint {
            settings.api_endpoint = v.clone();
        }
        if let Some(ref v) = self.moderation_endpoint {
            settings.moderation_endpoint = v.clone();
        }
        if let Some(ref v) = self.model {
            settings.model_name = v.clone();
        }
        if let Some(v) = self.max_attempts {
            settings.max_attempts = v;
        }
        if let Some(ref v) = self.system_prompt {
            settings.system_prompt = v.clone();
        }
        settings
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the conversation
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let settings = cli.apply(AppSettings::load().with_env());

    if settings.api_key.trim().is_empty() {
        bail!(
            "missing API key: pass --api-key, set {}, or save one with --save-settings",
            ENV_API_KEY
        );
    }

    if cli.save_settings {
        let path = settings.save().map_err(anyhow::Error::msg)?;
        info!("Saved settings to {}", path.display());
    }

    debug!(
        model = %settings.model_name,
        api_endpoint = %settings.api_endpoint,
        moderation_endpoint = %settings.moderation_endpoint,
        max_attempts = settings.max_attempts,
        "Starting chat"
    );

    let client = ModeratedCompletionClient::openai(
        settings.model_config(),
        settings.moderation_config(),
        settings.chat_config(),
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let query = read_query(&mut stdin.lock(), &mut stdout)?;

    let reply = client.chat(&query).await;
    if !reply.is_answer() {
        info!(reply = ?reply, "Returning fallback reply");
    }

    writeln!(stdout, "{}", format_output(reply.text()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underscore_aliases() {
        let cli = Cli::parse_from([
            "moderated-chat",
            "--api_key",
            "sk-test",
            "--api_endpoint",
            "http://localhost:8000/v1/chat/completions",
            "--moderation_endpoint",
            "http://localhost:8000/v1/moderations",
        ]);
        let settings = cli.apply(AppSettings::default());
        assert_eq!(settings.api_key, "sk-test");
        assert_eq!(settings.api_endpoint, "http://localhost:8000/v1/chat/completions");
        assert_eq!(settings.moderation_endpoint, "http://localhost:8000/v1/moderations");
    }

    #[test]
    fn test_flags_override_settings() {
        let base = AppSettings {
            api_key: "sk-saved".to_string(),
            model_name: "saved-model".to_string(),
            ..AppSettings::default()
        };
        let cli = Cli::parse_from(["moderated-chat", "--model", "gpt-4o-mini", "--max-attempts", "5"]);
        let settings = cli.apply(base);
        assert_eq!(settings.api_key, "sk-saved");
        assert_eq!(settings.model_name, "gpt-4o-mini");
        assert_eq!(settings.max_attempts, 5);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        assert!(Cli::try_parse_from(["moderated-chat", "--max-attempts", "0"]).is_err());
    }
}

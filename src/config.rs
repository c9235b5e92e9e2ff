use anyhow::{Context, Result};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// Base URL of an OpenAI-compatible API, without a trailing path.
    pub base_url: String,
    /// Chat completion model.
    pub model: String,
    /// Image generation model.
    pub image_model: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub openai: OpenAiConfig,
}

/// Reads a required environment variable; missing or blank is an error
/// naming the variable.
fn require_env(name: &str) -> Result<String> {
    let value = std::env::var(name).with_context(|| format!("{} is not set", name))?;
    if value.trim().is_empty() {
        anyhow::bail!("{} is set but empty", name);
    }
    Ok(value)
}

/// Reads an optional environment variable; an empty value counts as unset.
fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// `TELEGRAM_BOT_TOKEN` and `OPENAI_API_KEY` are required; `OPENAI_BASE_URL`,
    /// `OPENAI_MODEL` and `OPENAI_IMAGE_MODEL` fall back to defaults.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            telegram: TelegramConfig {
                bot_token: require_env("TELEGRAM_BOT_TOKEN")?,
            },
            openai: OpenAiConfig {
                api_key: require_env("OPENAI_API_KEY")?,
                base_url: env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL),
                model: env_or("OPENAI_MODEL", DEFAULT_MODEL),
                image_model: env_or("OPENAI_IMAGE_MODEL", DEFAULT_IMAGE_MODEL),
            },
        })
    }
}

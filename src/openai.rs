use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OpenAiConfig;

const IMAGE_SIZE: &str = "1024x1024";
const IMAGE_QUALITY: &str = "standard";

/// Calls against the model provider, one per incoming event.
/// Implemented by [`OpenAiClient`]; handlers only see this trait.
#[async_trait]
pub trait ModelApi: Send + Sync {
    /// One chat completion: a system instruction plus a single user turn.
    async fn chat(&self, system_prompt: &str, user_text: &str) -> Result<String>;

    /// Generates an image and returns the URL it was published under.
    async fn generate_image(&self, prompt: &str) -> Result<String>;

    /// Fetches generated image bytes from the URL returned by `generate_image`.
    async fn download_image(&self, url: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImageRequest {
    model: String,
    prompt: String,
    n: u8,
    size: &'static str,
    quality: &'static str,
    response_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

pub struct OpenAiClient {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn post_json<T: Serialize>(&self, path: &str, request: &T) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.config.base_url, path);

        debug!("Sending request to OpenAI: {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .context("Failed to send request to OpenAI")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error ({}): {}", status, error_body);
        }

        Ok(response)
    }
}

#[async_trait]
impl ModelApi for OpenAiClient {
    async fn chat(&self, system_prompt: &str, user_text: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_text.to_string(),
                },
            ],
        };

        let response = self.post_json("/chat/completions", &request).await?;

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI chat response")?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .context("No completion in OpenAI response")
    }

    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let request = ImageRequest {
            model: self.config.image_model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: IMAGE_SIZE,
            quality: IMAGE_QUALITY,
            response_format: "url",
        };

        let response = self.post_json("/images/generations", &request).await?;

        let image_response: ImageResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI image response")?;

        image_response
            .data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .context("No image URL in OpenAI response")
    }

    async fn download_image(&self, url: &str) -> Result<Vec<u8>> {
        debug!("Downloading generated image: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to download generated image")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Image download failed ({})", status);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read image bytes")?;
        Ok(bytes.to_vec())
    }
}

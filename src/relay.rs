use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::openai::ModelApi;
use crate::platform::Event;

/// System instruction sent with every chat completion.
const SYSTEM_PROMPT: &str = "You are a soviet comrade helpful assistant.";

/// Fixed `/start` greeting.
const GREETING: &str = "Shalom! Я отвечаю через OpenAI. Задавай любые вопросы!";

/// Fixed `/help` text (legacy Telegram Markdown).
const HELP: &str = "🤖 *Бот с интеграцией OpenAI*\n\n\
    Я использую искусственный интеллект для ответов на ваши вопросы!\n\n\
    *Доступные команды:*\n\
    /start - Начать общение с ботом\n\
    /help - Показать это сообщение\n\
    /image <описание> - Сгенерировать изображение\n\n\
    *Как пользоваться:*\n\
    Просто отправьте мне любое сообщение или вопрос, и я отвечу с помощью OpenAI! 🚀\n\n\
    *Пример генерации изображения:*\n\
    `/image красивый закат над океаном`";

/// Reply to `/image` without a prompt; sent without calling any service.
const IMAGE_USAGE: &str = "❌ Пожалуйста, укажите описание изображения.\n\
    Пример: `/image красивый закат над океаном`";

/// Prefix for a failed echo reply; the failure description follows.
pub const ECHO_ERROR_PREFIX: &str = "Ошибка: ";

/// Prefix for a failed image generation; written into the status placeholder.
pub const IMAGE_ERROR_PREFIX: &str = "❌ Ошибка при генерации изображения: ";

/// Outcome of the `/image` command.
#[derive(Debug)]
pub enum ImageReply {
    /// No prompt was given; carries the usage text. No service call was made.
    Usage(&'static str),
    /// A generated photo ready to send, caption in legacy Markdown.
    Photo { bytes: Vec<u8>, caption: String },
}

/// The message relay: maps one inbound event to one outbound reply.
///
/// Holds only a shared handle to the model API, so concurrent events need no
/// synchronization. Errors are returned to the platform layer, which renders
/// them with [`ECHO_ERROR_PREFIX`] / [`IMAGE_ERROR_PREFIX`].
pub struct Relay {
    api: Arc<dyn ModelApi>,
}

impl Relay {
    pub fn new(api: Arc<dyn ModelApi>) -> Self {
        Self { api }
    }

    /// Fixed greeting for `/start`.
    pub fn handle_start(&self) -> &'static str {
        GREETING
    }

    /// Fixed usage description for `/help`.
    pub fn handle_help(&self) -> &'static str {
        HELP
    }

    /// Forwards the event text to the chat model and returns the trimmed reply.
    pub async fn handle_echo(&self, event: &Event) -> Result<String> {
        let reply = self.api.chat(SYSTEM_PROMPT, &event.text).await?;

        info!("Message processed successfully");
        Ok(reply.trim().to_string())
    }

    /// Generates an image for the prompt and downloads its bytes.
    ///
    /// An empty prompt short-circuits to [`ImageReply::Usage`] before any
    /// service call.
    pub async fn handle_image(&self, prompt: &str) -> Result<ImageReply> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Ok(ImageReply::Usage(IMAGE_USAGE));
        }

        info!("Generating image with prompt: {}", prompt);

        let url = self.api.generate_image(prompt).await?;
        let bytes = self.api.download_image(&url).await?;

        Ok(ImageReply::Photo {
            bytes,
            caption: format!("🎨 Изображение по запросу: _{}_", prompt),
        })
    }
}

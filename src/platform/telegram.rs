use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, InputFile, ParseMode};
use tracing::{debug, error, info, warn};

use crate::platform::{command, Event};
use crate::relay::{ImageReply, Relay, ECHO_ERROR_PREFIX, IMAGE_ERROR_PREFIX};

/// Status placeholder shown while an image is being generated.
const IMAGE_WAIT: &str = "🎨 Генерирую изображение, подождите...";

/// Split long messages for Telegram's 4096 char limit
fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + max_len).min(text.len());
        // Walk back to a valid UTF-8 char boundary so slicing doesn't panic
        while end > start && !text.is_char_boundary(end) {
            end -= 1;
        }
        let actual_end = if end < text.len() {
            text[start..end]
                .rfind('\n')
                .or_else(|| text[start..end].rfind(' '))
                .map(|pos| start + pos + 1)
                .unwrap_or(end)
        } else {
            end
        };

        chunks.push(text[start..actual_end].to_string());
        start = actual_end;
    }

    chunks
}

/// Run the Telegram long-polling loop until shutdown.
pub async fn run(bot: Bot, relay: Arc<Relay>) -> Result<()> {
    info!("Starting Telegram long polling...");

    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![relay])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, relay: Arc<Relay>) -> ResponseResult<()> {
    let sender = match msg.from.as_ref() {
        Some(user) => user.first_name.clone(),
        None => return Ok(()),
    };

    let text = match msg.text() {
        Some(t) => t.to_string(),
        None => return Ok(()),
    };

    let event = Event {
        chat_id: msg.chat.id.0,
        sender,
        text,
    };

    info!(
        "Telegram message from {} ({}): {}",
        event.sender, event.chat_id, event.text
    );

    if let Some((name, args)) = command(&event.text) {
        return handle_command(&bot, &msg, &relay, name, args).await;
    }

    // Show "typing..." while the completion is in flight
    bot.send_chat_action(msg.chat.id, ChatAction::Typing)
        .await
        .ok();

    match relay.handle_echo(&event).await {
        Ok(reply) => {
            for chunk in split_message(&reply, 4000) {
                bot.send_message(msg.chat.id, chunk).await.ok();
            }
        }
        Err(e) => {
            error!("Error processing message: {:#}", e);
            bot.send_message(msg.chat.id, format!("{}{}", ECHO_ERROR_PREFIX, e))
                .await?;
        }
    }

    Ok(())
}

async fn handle_command(
    bot: &Bot,
    msg: &Message,
    relay: &Relay,
    name: &str,
    args: &str,
) -> ResponseResult<()> {
    match name {
        "/start" => {
            bot.send_message(msg.chat.id, relay.handle_start()).await?;
        }
        "/help" => {
            bot.send_message(msg.chat.id, relay.handle_help())
                .parse_mode(ParseMode::Markdown)
                .await?;
        }
        "/image" => return handle_image(bot, msg, relay, args).await,
        other => {
            debug!("Ignoring unknown command: {}", other);
        }
    }

    Ok(())
}

async fn handle_image(
    bot: &Bot,
    msg: &Message,
    relay: &Relay,
    args: &str,
) -> ResponseResult<()> {
    // The usage reply is immediate; only a real generation gets a placeholder.
    let placeholder = if args.trim().is_empty() {
        None
    } else {
        Some(bot.send_message(msg.chat.id, IMAGE_WAIT).await?)
    };

    // Telegram may reject the photo send itself (e.g. unbalanced Markdown in
    // the caption); that failure is rendered into the placeholder too.
    let failure = match relay.handle_image(args).await {
        Ok(ImageReply::Usage(text)) => {
            bot.send_message(msg.chat.id, text)
                .parse_mode(ParseMode::Markdown)
                .await?;
            return Ok(());
        }
        Ok(ImageReply::Photo { bytes, caption }) => {
            let sent = bot
                .send_photo(msg.chat.id, InputFile::memory(bytes))
                .caption(caption)
                .parse_mode(ParseMode::Markdown)
                .await;
            match sent {
                Ok(_) => {
                    if let Some(placeholder) = &placeholder {
                        bot.delete_message(msg.chat.id, placeholder.id).await.ok();
                    }
                    info!("Image generated and sent successfully");
                    return Ok(());
                }
                Err(e) => {
                    error!("Error generating image: {}", e);
                    e.to_string()
                }
            }
        }
        Err(e) => {
            error!("Error generating image: {:#}", e);
            e.to_string()
        }
    };

    let text = format!("{}{}", IMAGE_ERROR_PREFIX, failure);
    match &placeholder {
        Some(placeholder) => {
            bot.edit_message_text(msg.chat.id, placeholder.id, text)
                .await?;
        }
        None => {
            bot.send_message(msg.chat.id, text).await?;
        }
    }

    Ok(())
}

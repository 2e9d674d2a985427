use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, InputFile, MessageId, ParseMode, ReplyParameters, User};
use teloxide::update_listeners::Polling;
use tracing::{debug, info, warn};

use crate::bot::{self, AppState};
use crate::commands::Command;
use crate::markdown;
use crate::platform::{IncomingMessage, Transport};

/// Telegram implementation of the outbound transport
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
    #[allow(dead_code)]
    http: reqwest::Client,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self {
            bot,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn reply(&self, chat_id: i64, reply_to: i32, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .reply_parameters(ReplyParameters::new(MessageId(reply_to)))
            .await
            .with_context(|| format!("Failed to reply in chat {}", chat_id))?;
        Ok(())
    }

    async fn reply_markdown(&self, chat_id: i64, reply_to: i32, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), markdown::repair(text))
            .parse_mode(ParseMode::MarkdownV2)
            .reply_parameters(ReplyParameters::new(MessageId(reply_to)))
            .await
            .with_context(|| format!("Failed to send markdown reply in chat {}", chat_id))?;
        Ok(())
    }

    async fn say(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .with_context(|| format!("Failed to send message to chat {}", chat_id))?;
        Ok(())
    }

    async fn send_image(&self, chat_id: i64, image_url: &str, caption: &str) -> Result<()> {
        debug!("Fetching image: {}", image_url);

        let image = self
            .http
            .get(image_url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch image: {}", image_url))?
            .error_for_status()
            .with_context(|| format!("Image request failed: {}", image_url))?
            .bytes()
            .await
            .context("Failed to read image body")?;

        self.bot
            .send_photo(
                ChatId(chat_id),
                InputFile::memory(image.to_vec()).file_name("image.png"),
            )
            .caption(caption)
            .await
            .with_context(|| format!("Failed to send image to chat {}", chat_id))?;
        Ok(())
    }
}

/// Publish the command menu shown by Telegram clients
async fn register_commands(bot: &Bot) -> Result<()> {
    let commands: Vec<BotCommand> = Command::menu()
        .into_iter()
        .map(|(command, description)| BotCommand::new(command, description))
        .collect();

    bot.set_my_commands(commands)
        .await
        .context("Failed to register bot commands")?;
    Ok(())
}

fn display_name(user: &User) -> String {
    user.username
        .clone()
        .unwrap_or_else(|| user.first_name.clone())
}

/// Run the Telegram long-poll loop until the process is stopped
pub async fn run(state: Arc<AppState>, token: &str, poll_timeout: Duration) -> Result<()> {
    let bot = Bot::new(token);

    let me = bot
        .get_me()
        .await
        .context("Failed to authorize with the bot token")?;
    info!("Authorized on account {}", me.username());

    if let Err(e) = register_commands(&bot).await {
        warn!("{:#}", e);
    }

    let transport = Arc::new(TelegramTransport::new(bot.clone()));

    info!(
        "Starting Telegram polling (timeout {}s)...",
        poll_timeout.as_secs()
    );

    let listener = Polling::builder(bot.clone()).timeout(poll_timeout).build();

    let handler = Update::filter_message().endpoint(handle_update);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state, transport])
        // one key for every update: handled one at a time, in arrival order
        .distribution_function(|_: &Update| Some(()))
        .default_handler(|upd| async move {
            debug!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("telegram polling"),
        )
        .await;

    Ok(())
}

async fn handle_update(
    msg: Message,
    state: Arc<AppState>,
    transport: Arc<TelegramTransport>,
) -> ResponseResult<()> {
    let text = match msg.text() {
        Some(t) => t,
        None => return Ok(()),
    };

    let user_name = msg.from.as_ref().map(display_name).unwrap_or_default();
    let incoming = IncomingMessage::new(msg.chat.id.0, msg.id.0, user_name, text);

    bot::handle_message(&state, transport.as_ref(), &incoming).await;
    Ok(())
}

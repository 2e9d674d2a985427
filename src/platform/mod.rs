pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;

use crate::commands::parse_command;

/// A message received from the chat platform
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub message_id: i32,
    /// Display name of the sender (username when available)
    pub user_name: String,
    /// The raw message text
    pub text: String,
    /// Command name when the text is a command invocation
    pub command: Option<String>,
    /// Everything after the command token
    pub command_args: Option<String>,
}

impl IncomingMessage {
    pub fn new(
        chat_id: i64,
        message_id: i32,
        user_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();
        let (command, command_args) = match parse_command(&text) {
            Some((name, args)) => (Some(name), Some(args)),
            None => (None, None),
        };
        Self {
            chat_id,
            message_id,
            user_name: user_name.into(),
            text,
            command,
            command_args,
        }
    }
}

/// Outbound side of a chat platform.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Reply to a message with plain text.
    async fn reply(&self, chat_id: i64, reply_to: i32, text: &str) -> Result<()>;

    /// Reply to a message in MarkdownV2; the text is repaired before sending.
    #[allow(dead_code)]
    async fn reply_markdown(&self, chat_id: i64, reply_to: i32, text: &str) -> Result<()>;

    /// Post plain text to a chat without quoting anything.
    async fn say(&self, chat_id: i64, text: &str) -> Result<()>;

    /// Fetch an image by URL and post it with a caption.
    #[allow(dead_code)]
    async fn send_image(&self, chat_id: i64, image_url: &str, caption: &str) -> Result<()>;
}

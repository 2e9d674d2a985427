use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::commands::Command;
use crate::config::SlapConfig;
use crate::platform::{IncomingMessage, Transport};
use crate::store::PhraseStore;

const NO_TEXT: &str = "Текст не задан";
const ADDED_PREFIX: &str = "Добавлена новая фраза: ";
const NO_PHRASES: &str = "Ни одной фразочки не было добавлено";

/// What a handler wants sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Plain text quoting the triggering message
    Reply(String),
    /// Plain text posted to the chat without quoting
    Say(String),
}

/// Shared application state
pub struct AppState {
    store: PhraseStore,
    slap: SlapConfig,
    // seeded once per process
    rng: Mutex<StdRng>,
}

impl AppState {
    pub fn new(store: PhraseStore, slap: SlapConfig) -> Self {
        Self::with_rng(store, slap, StdRng::from_os_rng())
    }

    pub fn with_rng(store: PhraseStore, slap: SlapConfig, rng: StdRng) -> Self {
        Self {
            store,
            slap,
            rng: Mutex::new(rng),
        }
    }

    /// Classify a message and run the matching handler.
    /// Returns `None` when the message is not for us.
    pub async fn respond(&self, msg: &IncomingMessage) -> Result<Option<Response>> {
        let Some((command, args)) = route(msg) else {
            return Ok(None);
        };

        debug!("Routing {:?} from chat {}", command, msg.chat_id);

        let response = match command {
            Command::Add => self.add(args).await?,
            Command::Phrase => self.phrase().await?,
            Command::Slap => self.slap(args).await,
        };
        Ok(Some(response))
    }

    async fn add(&self, args: &str) -> Result<Response> {
        if args.is_empty() {
            return Ok(Response::Reply(NO_TEXT.to_string()));
        }

        let stored = self.store.append(args).await?;
        info!("Added phrase: {}", stored);
        Ok(Response::Reply(format!("{}{}", ADDED_PREFIX, stored)))
    }

    async fn phrase(&self) -> Result<Response> {
        let phrases = self.store.load().await?;

        let text = match self.pick(&phrases).await {
            Some(phrase) => phrase.clone(),
            None => NO_PHRASES.to_string(),
        };
        Ok(Response::Reply(text))
    }

    async fn slap(&self, args: &str) -> Response {
        let target = match args.trim() {
            "" => self.pick(&self.slap.targets).await.cloned().unwrap_or_default(),
            name => name.to_string(),
        };
        let template = self
            .pick(&self.slap.templates)
            .await
            .map(String::as_str)
            .unwrap_or("{target}");

        Response::Say(template.replacen("{target}", &target, 1))
    }

    async fn pick<'a>(&self, items: &'a [String]) -> Option<&'a String> {
        if items.is_empty() {
            return None;
        }
        let index = self.rng.lock().await.random_range(0..items.len());
        items.get(index)
    }
}

/// Resolve a message to a command and its argument string.
pub fn route(msg: &IncomingMessage) -> Option<(Command, &str)> {
    if msg.text.is_empty() {
        return None;
    }

    match &msg.command {
        Some(token) => {
            let command = Command::from_token(token)?;
            Some((command, msg.command_args.as_deref().unwrap_or("")))
        }
        None => Command::from_trigger(&msg.text).map(|command| (command, "")),
    }
}

/// Handle one inbound message end to end: route, run, send.
///
/// Store failures are logged and the message is dropped; send failures are
/// logged and not retried.
pub async fn handle_message(state: &AppState, transport: &dyn Transport, msg: &IncomingMessage) {
    info!("[{}] {}", msg.user_name, msg.text);

    let response = match state.respond(msg).await {
        Ok(Some(response)) => response,
        Ok(None) => return,
        Err(e) => {
            error!(
                "Failed to handle message {} in chat {}: {:#}",
                msg.message_id, msg.chat_id, e
            );
            return;
        }
    };

    let sent = match &response {
        Response::Reply(text) => transport.reply(msg.chat_id, msg.message_id, text).await,
        Response::Say(text) => transport.say(msg.chat_id, text).await,
    };
    if let Err(e) = sent {
        error!("Error sending message: {:#}", e);
    }
}

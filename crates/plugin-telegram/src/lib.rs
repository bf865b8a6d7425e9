//! Minimal Telegram Bot API sender.
//!
//! Only `sendMessage` is used: a single GET request carrying the chat id and
//! the url-encoded text, with success meaning HTTP 200.

mod client;
mod error;

use async_trait::async_trait;

pub use client::{DEFAULT_API_BASE, TelegramClient};
pub use error::TelegramError;

/// Anything able to deliver a plain text message to a bot chat.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_message(&self, token: &str, chat_id: &str, text: &str)
    -> Result<(), TelegramError>;
}

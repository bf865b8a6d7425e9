use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::{TelegramError, Transport};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: Client,
    api_base: String,
}

impl TelegramClient {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_api_base(client, DEFAULT_API_BASE)
    }

    pub fn with_api_base(client: Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
        }
    }

    fn send_message_url(&self, token: &str) -> String {
        format!(
            "{}/bot{token}/sendMessage",
            self.api_base.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Transport for TelegramClient {
    async fn send_message(
        &self,
        token: &str,
        chat_id: &str,
        text: &str,
    ) -> Result<(), TelegramError> {
        if token.is_empty() || chat_id.is_empty() {
            return Err(TelegramError::MissingCredentials);
        }

        // The token is part of the path; keep it out of error messages.
        let resp = self
            .client
            .get(self.send_message_url(token))
            .query(&[("chat_id", chat_id), ("text", text)])
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Telegram rejected message");
            return Err(TelegramError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!(chat_id = %chat_id, "Telegram message delivered");
        Ok(())
    }
}

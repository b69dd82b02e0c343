pub mod error;

pub use error::{Result, TelegramError};

use serde::Serialize;
use tracing::debug;

const BASE_URL: &str = "https://api.telegram.org";

#[derive(Serialize)]
struct SendMessageBody<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Bot API client used to deliver curated posts to private destinations.
///
/// Delivery is fire-and-forget at the pipeline boundary: callers log a
/// failure and move on, they never retry or block a row on it.
pub struct TelegramClient {
    http: reqwest::Client,
    token: String,
}

impl TelegramClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.into(),
        }
    }

    /// Send an HTML-formatted message to a chat. Ok(()) means Telegram
    /// accepted it.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", BASE_URL, self.token);
        let body = SendMessageBody {
            chat_id,
            text,
            parse_mode: "HTML",
        };

        let response = self.http.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TelegramError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!(chat_id, "message delivered");
        Ok(())
    }
}

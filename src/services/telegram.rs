use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

use super::Notifier;

const TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    description: Option<String>,
}

/// Telegram Bot API client
pub struct TelegramClient {
    client: Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramClient {
    pub fn new(bot_token: String, chat_id: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            bot_token,
            chat_id,
        })
    }

    /// Send an HTML message with link previews enabled
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", TELEGRAM_API_URL, self.bot_token);

        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: false,
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Telegram(format!("HTTP {}: {}", status, error_text)));
        }

        let body: TelegramResponse = response.json().await?;
        if !body.ok {
            return Err(AppError::Telegram(
                body.description
                    .unwrap_or_else(|| "request was not accepted".to_string()),
            ));
        }

        Ok(())
    }
}

impl Notifier for TelegramClient {
    async fn send(&self, text: &str) -> Result<()> {
        self.send_message(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_bot_api_fields() {
        let request = SendMessageRequest {
            chat_id: "-100123",
            text: "<b>hi</b>",
            parse_mode: "HTML",
            disable_web_page_preview: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "chat_id": "-100123",
                "text": "<b>hi</b>",
                "parse_mode": "HTML",
                "disable_web_page_preview": false
            })
        );
    }

    #[test]
    fn parses_error_response() {
        let raw = r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#;
        let body: TelegramResponse = serde_json::from_str(raw).unwrap();
        assert!(!body.ok);
        assert_eq!(body.description.as_deref(), Some("Bad Request: chat not found"));
    }
}

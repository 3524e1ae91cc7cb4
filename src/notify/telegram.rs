//! Telegram notification channel

use super::Notifier;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Sends alerts through the Telegram Bot API
pub struct TelegramNotifier {
    client: Client,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Create a notifier for the given bot token and chat
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self {
            client,
            token: token.into(),
            chat_id: chat_id.into(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);
        let result = self
            .client
            .post(&url)
            .form(&[("chat_id", self.chat_id.as_str()), ("text", text)])
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::debug!("telegram delivered");
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "telegram rejected message");
            }
            Err(error) => {
                tracing::warn!(%error, "telegram delivery failed");
            }
        }
    }
}

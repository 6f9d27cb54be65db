//! Outbound alert transport.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::NotifyError;

/// Base URL of the Telegram Bot API.
const TELEGRAM_API: &str = "https://api.telegram.org";

/// Delivers a text message somewhere a human will see it.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Sends `message`.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails.
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;
}

/// Telegram bot `sendMessage` transport.
///
/// Without both a token and a chat id, [`Notifier::notify`] does nothing and
/// succeeds.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    bot_token: Option<String>,
    chat_id: Option<String>,
}

impl TelegramNotifier {
    /// Creates a notifier. Blank credentials count as missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(bot_token: Option<String>, chat_id: Option<String>) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(format!("candlewatch/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_base: TELEGRAM_API.to_string(),
            bot_token: bot_token.filter(|t| !t.trim().is_empty()),
            chat_id: chat_id.filter(|c| !c.trim().is_empty()),
        })
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Returns true if both credentials are present.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let (Some(token), Some(chat_id)) = (&self.bot_token, &self.chat_id) else {
            tracing::debug!("telegram credentials not set; skipping notification");
            return Ok(());
        };

        let url = format!("{}/bot{}/sendMessage", self.api_base.trim_end_matches('/'), token);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "chat_id": chat_id, "text": message }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

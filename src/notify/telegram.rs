//! Telegram Bot API transport.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use super::{DeliveryReport, Notifier, NotifyError};

pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Update {
    #[serde(default)]
    message: Option<UpdateMessage>,
}

#[derive(Debug, Deserialize)]
struct UpdateMessage {
    chat: Chat,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    username: Option<String>,
}

/// A chat that recently messaged the bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSummary {
    pub chat_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl From<Chat> for ChatSummary {
    fn from(chat: Chat) -> Self {
        let name = match chat.title {
            Some(title) => title,
            None => [chat.first_name, chat.last_name]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" "),
        };
        Self {
            chat_id: chat.id,
            kind: chat.kind,
            name,
            username: chat.username,
        }
    }
}

pub struct TelegramNotifier {
    http: Client,
    base_url: String,
    bot_token: Option<String>,
    chat_id: Option<String>,
}

impl TelegramNotifier {
    pub fn new(http: Client, bot_token: Option<String>, chat_id: Option<String>) -> Self {
        Self::with_base_url(http, bot_token, chat_id, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        http: Client,
        bot_token: Option<String>,
        chat_id: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            bot_token,
            chat_id,
        }
    }

    fn method_url(&self, token: &str, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, token, method)
    }

    async fn post_message(&self, token: &str, chat_id: &str, text: &str) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(self.method_url(token, "sendMessage"))
            .json(&json!({
                "chat_id": chat_id,
                "text": text,
                "parse_mode": "HTML",
            }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let description = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
            .ok()
            .and_then(|r| r.description)
            .unwrap_or_else(|| format!("status {}: {}", status.as_u16(), body));
        Err(NotifyError::Rejected(description))
    }

    /// Chats found in recent `getUpdates`, used to look up the chat id.
    pub async fn recent_chats(&self) -> Result<Vec<ChatSummary>, NotifyError> {
        let token = self
            .bot_token
            .as_deref()
            .ok_or(NotifyError::NotConfigured("TELEGRAM_BOT_TOKEN is not set"))?;

        let response: ApiResponse<Vec<Update>> = self
            .http
            .get(self.method_url(token, "getUpdates"))
            .send()
            .await?
            .json()
            .await?;

        if !response.ok {
            return Err(NotifyError::Rejected(
                response.description.unwrap_or_else(|| "getUpdates failed".to_string()),
            ));
        }

        let mut chats: Vec<ChatSummary> = Vec::new();
        for update in response.result.unwrap_or_default() {
            let Some(message) = update.message else {
                continue;
            };
            let summary = ChatSummary::from(message.chat);
            if !chats.iter().any(|c| c.chat_id == summary.chat_id) {
                chats.push(summary);
            }
        }
        Ok(chats)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> DeliveryReport {
        let (Some(token), Some(chat_id)) = (self.bot_token.as_deref(), self.chat_id.as_deref())
        else {
            warn!("telegram: credentials missing, message not sent");
            return DeliveryReport::failed("TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID is not set");
        };

        match self.post_message(token, chat_id, text).await {
            Ok(()) => {
                info!(chars = text.len(), "telegram: message delivered");
                DeliveryReport::delivered("message sent")
            }
            Err(e) => {
                error!(error = %e, "telegram: delivery failed");
                DeliveryReport::failed(match e {
                    NotifyError::Rejected(description) => description,
                    other => other.to_string(),
                })
            }
        }
    }
}

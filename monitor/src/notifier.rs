//! Best-effort notifications to a chat webhook

use crate::rcon::REQUEST_TIMEOUT;
use async_trait::async_trait;
use log::info;
use reqwest::Client;
use shared::WebhookMessage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("webhook responded with status {0}")]
    Status(u16),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;
}

/// Posts `{"content": message}` to a Discord-compatible webhook
#[derive(Debug, Clone)]
pub struct DiscordWebhook {
    http: Client,
    url: String,
}

impl DiscordWebhook {
    pub fn new(url: &str) -> Result<Self, NotifyError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Notifier for DiscordWebhook {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let body = WebhookMessage {
            content: message.to_string(),
        };
        let response = self.http.post(&self.url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(NotifyError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Used when no webhook is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn notify(&self, _message: &str) -> Result<(), NotifyError> {
        info!("Discord webhook not set, skipping send.");
        Ok(())
    }
}

/// Picks the webhook notifier when a URL is configured
pub fn from_url(url: Option<&str>) -> Result<Box<dyn Notifier>, NotifyError> {
    match url {
        Some(url) => Ok(Box::new(DiscordWebhook::new(url)?)),
        None => Ok(Box::new(DisabledNotifier)),
    }
}

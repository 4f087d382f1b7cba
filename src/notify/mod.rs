//! Outbound notifications for contact form submissions.
//!
//! Nothing is persisted: a submission is delivered once and the result reported to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::Config;

/// A message for the site administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub reply_to: String,
}

/// Delivery failed; the message is for logs only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyError(pub String);

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "notification delivery failed: {}", self.0)
    }
}

impl std::error::Error for NotifyError {}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Posts the notification as JSON to a webhook (mail relay, chat hook, ...).
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(notification)
            .send()
            .await
            .map_err(|e| NotifyError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError(format!("webhook returned {}", response.status())));
        }
        Ok(())
    }
}

/// Records notifications in the log when no delivery channel is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            to = %notification.to,
            reply_to = %notification.reply_to,
            subject = %notification.subject,
            "Contact notification:\n{}",
            notification.body
        );
        Ok(())
    }
}

/// Pick the notifier for the configured delivery channel.
pub fn from_config(config: &Config) -> Arc<dyn Notifier> {
    match &config.notify_webhook {
        Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
        None => {
            tracing::warn!("No CMS_NOTIFY_WEBHOOK configured; contact submissions are only logged");
            Arc::new(LogNotifier)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_notifier_always_delivers() {
        let notification = Notification {
            to: "admin@example.com".to_string(),
            subject: "[Site] Contact Form".to_string(),
            body: "Hello".to_string(),
            reply_to: "visitor@example.com".to_string(),
        };
        assert!(LogNotifier.send(&notification).await.is_ok());
    }

    #[tokio::test]
    async fn test_webhook_unreachable_is_error() {
        // Port 9 (discard) on localhost is not listening in test environments.
        let notifier = WebhookNotifier::new("http://127.0.0.1:9/hook");
        let notification = Notification {
            to: "admin@example.com".to_string(),
            subject: "s".to_string(),
            body: "b".to_string(),
            reply_to: "r@example.com".to_string(),
        };
        assert!(notifier.send(&notification).await.is_err());
    }
}

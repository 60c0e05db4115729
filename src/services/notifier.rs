//! Outgoing email notifications.
//!
//! Without an SMTP host configured, messages are written to the log instead
//! of being sent.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Email message payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Recipient email address
    pub to: String,
    /// Email subject line
    pub subject: String,
    /// Plain text body
    pub body: String,
}

impl EmailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Greeting sent after a successful registration.
    pub fn welcome(name: &str, email: &str) -> Self {
        Self::new(
            email,
            "Welcome to Skincare Tracker",
            format!(
                "Hi {},\n\nYour account is ready. Log in to start tracking your routine.",
                name
            ),
        )
    }
}

/// Delivery channel for outgoing email.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: EmailMessage) -> AppResult<()>;
}

/// Notifier that logs messages.
pub struct LogNotifier {
    from: String,
    smtp_host: Option<String>,
}

impl LogNotifier {
    pub fn new(from: impl Into<String>, smtp_host: Option<String>) -> Self {
        Self {
            from: from.into(),
            smtp_host,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.mail_from.clone(), config.smtp_host.clone())
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: EmailMessage) -> AppResult<()> {
        tracing::info!(
            to = %message.to,
            from = %self.from,
            subject = %message.subject,
            "Processing email"
        );

        match &self.smtp_host {
            None => {
                tracing::info!(
                    "=== EMAIL (not sent) ===\n\
                     From: {}\n\
                     To: {}\n\
                     Subject: {}\n\
                     Body:\n{}\n\
                     ========================",
                    self.from,
                    message.to,
                    message.subject,
                    message.body
                );
            }
            Some(host) => {
                tracing::warn!(
                    smtp_host = %host,
                    "SMTP delivery is not wired in this build, email logged only"
                );
            }
        }

        Ok(())
    }
}

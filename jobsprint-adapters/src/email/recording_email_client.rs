use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::sync::RwLock;

use jobsprint_core::{Email, EmailClient};

/// What a `RecordingEmailClient` captured for one send.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub content: String,
}

/// `EmailClient` test double that records every send instead of delivering.
///
/// Tests read the one-time code back out of the recorded body, standing in
/// for the account holder's inbox.
#[derive(Debug, Clone, Default)]
pub struct RecordingEmailClient {
    sent: Arc<RwLock<Vec<SentEmail>>>,
}

impl RecordingEmailClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<SentEmail> {
        self.sent.read().await.clone()
    }
}

#[async_trait::async_trait]
impl EmailClient for RecordingEmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), String> {
        self.sent.write().await.push(SentEmail {
            recipient: recipient.as_ref().expose_secret().clone(),
            subject: subject.to_string(),
            content: content.to_string(),
        });
        Ok(())
    }
}

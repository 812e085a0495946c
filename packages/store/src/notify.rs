use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use verdant_content::{Notification, NotificationChannel, StoreError};

/// A notification accepted by the outbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboxEntry {
    pub subject: String,
    pub notification: Notification,
    pub queued_at: DateTime<Utc>,
}

/// Notification channel that records messages instead of delivering them.
///
/// With a journal path, each accepted message is also appended to that file
/// as one JSON line for a mail relay to pick up.
#[derive(Default)]
pub struct OutboxNotifier {
    entries: Mutex<Vec<OutboxEntry>>,
    journal: Option<PathBuf>,
}

impl OutboxNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_journal(path: impl Into<PathBuf>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            journal: Some(path.into()),
        }
    }

    pub async fn entries(&self) -> Vec<OutboxEntry> {
        self.entries.lock().await.clone()
    }

    async fn append_journal(&self, entry: &OutboxEntry) -> Result<(), StoreError> {
        let Some(path) = &self.journal else {
            return Ok(());
        };

        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for OutboxNotifier {
    async fn send(&self, notification: Notification) -> Result<(), StoreError> {
        notification.validate()?;

        let entry = OutboxEntry {
            subject: notification.subject(),
            notification,
            queued_at: Utc::now(),
        };
        self.append_journal(&entry).await?;

        tracing::info!("[Outbox] queued \"{}\"", entry.subject);
        self.entries.lock().await.push(entry);
        Ok(())
    }
}

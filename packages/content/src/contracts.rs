//! # Collaborator Contracts
//!
//! What the editing core expects from the services around it. Concrete
//! transports (HTTP, SQL, FTP, SMTP) live outside the core; anything that
//! satisfies these traits can back an editing session.

use crate::ContentDocument;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Network or backend unavailable
    #[error("Transport error: {0}")]
    Transport(String),

    /// Backend refused the request (malformed document, duplicate ids, ...)
    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Failures worth retrying unchanged
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transport(_) | StoreError::Io(_))
    }
}

/// Persistence of the whole content document
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Load the current document (once per editing session)
    async fn fetch_document(&self) -> Result<ContentDocument, StoreError>;

    /// Replace the stored document as one unit
    async fn replace_document(&self, document: &ContentDocument) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    pub name: String,
    /// Public URL; opaque to the editor
    pub url: String,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaListing {
    pub directories: Vec<String>,
    pub files: Vec<MediaFile>,
}

/// Image/media library backing the admin's image pickers
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn list_entries(&self, path: &str) -> Result<MediaListing, StoreError>;

    /// Store `bytes` as `path/filename`, returning the stored file
    async fn upload(&self, path: &str, filename: &str, bytes: &[u8])
        -> Result<MediaFile, StoreError>;

    async fn delete_file(&self, path: &str, filename: &str) -> Result<(), StoreError>;

    async fn create_folder(&self, path: &str) -> Result<(), StoreError>;

    async fn delete_folder(&self, path: &str) -> Result<(), StoreError>;
}

/// Outbound message from a public page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Notification {
    Contact {
        name: String,
        email: String,
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    Donation {
        name: String,
        email: String,
        amount_cents: u64,
        currency: String,
    },
}

impl Notification {
    /// Check required fields before handing off to a channel
    pub fn validate(&self) -> Result<(), StoreError> {
        let missing: Vec<&str> = match self {
            Notification::Contact {
                name,
                email,
                message,
            } => [("name", name), ("email", email), ("message", message)]
                .iter()
                .filter(|(_, value)| value.trim().is_empty())
                .map(|(field, _)| *field)
                .collect(),
            Notification::Donation {
                email,
                amount_cents,
                ..
            } => {
                let mut missing = Vec::new();
                if email.trim().is_empty() {
                    missing.push("email");
                }
                if *amount_cents == 0 {
                    missing.push("amount");
                }
                missing
            }
        };

        if missing.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Rejected(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }

    /// Subject line for the outgoing message
    pub fn subject(&self) -> String {
        match self {
            Notification::Contact { name, .. } => {
                format!("New Contact Form Message from {}", name)
            }
            Notification::Donation {
                name,
                amount_cents,
                currency,
                ..
            } => format!(
                "New donation of {}.{:02} {} from {}",
                amount_cents / 100,
                amount_cents % 100,
                currency.to_uppercase(),
                name
            ),
        }
    }
}

/// Fire-and-forget delivery (contact form, donation alerts)
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send(&self, notification: Notification) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_requires_all_fields() {
        let notification = Notification::Contact {
            name: "Ana".to_string(),
            email: " ".to_string(),
            message: String::new(),
        };

        match notification.validate() {
            Err(StoreError::Rejected(msg)) => {
                assert_eq!(msg, "missing required fields: email, message")
            }
            other => panic!("Expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_donation_subject() {
        let notification = Notification::Donation {
            name: "Luis".to_string(),
            email: "luis@example.org".to_string(),
            amount_cents: 2550,
            currency: "usd".to_string(),
        };

        assert!(notification.validate().is_ok());
        assert_eq!(notification.subject(), "New donation of 25.50 USD from Luis");
    }

    #[test]
    fn test_notification_wire_format() {
        let notification = Notification::Contact {
            name: "Ana".to_string(),
            email: "ana@example.org".to_string(),
            message: "Hi".to_string(),
        };
        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["kind"], "contact");
        assert_eq!(json["message"], "Hi");
    }

    #[test]
    fn test_transient_errors() {
        assert!(StoreError::Transport("down".to_string()).is_transient());
        assert!(!StoreError::Rejected("bad".to_string()).is_transient());
    }
}

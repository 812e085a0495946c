//! # Publish Protocol
//!
//! Sends the working copy to the content store as one indivisible document
//! and promotes it to `published` once the store confirms.
//!
//! ## Design
//!
//! A publish is split in three steps so edits can continue while the store
//! call is in flight:
//!
//! 1. `begin_publish` snapshots `working` and converts it to the typed
//!    document. A conversion failure, or a field the typed document would
//!    drop, is a validation rejection: nothing is sent and `working` is
//!    untouched.
//! 2. The caller awaits `ContentStore::replace_document` with the ticket's
//!    document.
//! 3. `finish_publish` promotes the document the store received on success,
//!    or records the failure and leaves the session Dirty. Missing halves of
//!    localized pairs are filled in by the typed document, so an unchanged
//!    `working` adopts the promoted form.
//!
//! Tickets are numbered. A ticket older than the last promoted one is stale
//! and never regresses `published`. Edits made after `begin_publish` are not
//! part of the ticket, so the session stays Dirty after promotion when
//! `working` has moved on.

use crate::session::{DraftSession, DraftStatus};
use crate::EditorError;
use serde_json::Value;
use std::sync::Arc;
use verdant_content::{ContentDocument, ContentStore, StoreError};

#[derive(Debug, Default)]
pub(crate) struct PublishState {
    /// Sequence number of the last ticket handed out
    pub(crate) issued: u64,
    /// Sequence number of the last ticket promoted to `published`
    pub(crate) promoted: u64,
    pub(crate) in_flight: usize,
    pub(crate) last_error: Option<String>,
}

/// Snapshot of `working` taken when a publish started
#[derive(Debug, Clone)]
pub struct PublishTicket {
    seq: u64,
    version: u64,
    /// `working` as it was when the ticket was issued
    snapshot: Value,
    /// `document` as JSON, the form `published` takes on promotion
    normalized: Value,
    document: ContentDocument,
}

impl PublishTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Session version the snapshot was taken at
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Document to hand to the store
    pub fn document(&self) -> &ContentDocument {
        &self.document
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub seq: u64,
    /// False when a newer ticket had already been promoted
    pub promoted: bool,
    pub status: DraftStatus,
}

impl DraftSession {
    /// Snapshot `working` for a store call
    pub fn begin_publish(&mut self) -> Result<PublishTicket, EditorError> {
        let snapshot = self.working.clone();
        let document = match ContentDocument::from_value(snapshot.clone()) {
            Ok(document) => document,
            Err(e) => return Err(self.reject_publish(e.to_string())),
        };
        let normalized = document.to_value()?;

        let mut lost = Vec::new();
        lost_fields(&snapshot, &normalized, "", &mut lost);
        if !lost.is_empty() {
            return Err(self.reject_publish(format!(
                "not part of the content document: {}",
                lost.join(", ")
            )));
        }

        self.publish.issued += 1;
        self.publish.in_flight += 1;

        tracing::info!(
            "[{}] publishing v{} (ticket {})",
            self.id,
            self.version,
            self.publish.issued
        );

        Ok(PublishTicket {
            seq: self.publish.issued,
            version: self.version,
            snapshot,
            normalized,
            document,
        })
    }

    fn reject_publish(&mut self, message: String) -> EditorError {
        tracing::warn!("[{}] publish rejected: {}", self.id, message);
        self.publish.last_error = Some(message.clone());
        EditorError::PublishRejected(message)
    }

    /// Settle a ticket with the store's answer
    pub fn finish_publish(
        &mut self,
        ticket: PublishTicket,
        result: Result<(), StoreError>,
    ) -> Result<PublishReport, EditorError> {
        self.publish.in_flight = self.publish.in_flight.saturating_sub(1);

        if let Err(e) = result {
            tracing::warn!("[{}] publish of ticket {} failed: {}", self.id, ticket.seq, e);
            if ticket.seq > self.publish.promoted {
                self.publish.last_error = Some(e.to_string());
            }
            return Err(e.into());
        }

        if ticket.seq < self.publish.promoted {
            tracing::debug!(
                "[{}] ticket {} is older than promoted ticket {}",
                self.id,
                ticket.seq,
                self.publish.promoted
            );
            return Ok(PublishReport {
                seq: ticket.seq,
                promoted: false,
                status: self.status,
            });
        }

        self.publish.promoted = ticket.seq;
        self.publish.last_error = None;
        if self.working == ticket.snapshot {
            self.working = ticket.normalized.clone();
        }
        self.published = ticket.normalized;
        self.published_tx.send_replace(Arc::new(ticket.document));

        self.status = if self.working == self.published {
            DraftStatus::Clean
        } else {
            DraftStatus::Dirty
        };

        tracing::info!(
            "[{}] published ticket {} (v{}), now {:?}",
            self.id,
            ticket.seq,
            ticket.version,
            self.status
        );

        Ok(PublishReport {
            seq: ticket.seq,
            promoted: true,
            status: self.status,
        })
    }

    /// Replace the stored document with `working` and promote it on success
    pub async fn publish<S: ContentStore + ?Sized>(
        &mut self,
        store: &S,
    ) -> Result<PublishReport, EditorError> {
        let ticket = self.begin_publish()?;
        let result = store.replace_document(ticket.document()).await;
        self.finish_publish(ticket, result)
    }

    /// Message of the last failed publish, until a publish succeeds or the
    /// draft is discarded
    pub fn last_publish_error(&self) -> Option<&str> {
        self.publish.last_error.as_deref()
    }

    pub fn is_publishing(&self) -> bool {
        self.publish.in_flight > 0
    }
}

/// Paths under `at` whose values in `raw` do not survive the typed round
/// trip. Nulls count as absent.
fn lost_fields(raw: &Value, typed: &Value, at: &str, lost: &mut Vec<String>) {
    let join = |key: &str| {
        if at.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", at, key)
        }
    };

    match (raw, typed) {
        (Value::Object(raw), Value::Object(typed)) => {
            for (key, value) in raw {
                match typed.get(key) {
                    Some(kept) => lost_fields(value, kept, &join(key), lost),
                    None if value.is_null() => {}
                    None => lost.push(join(key)),
                }
            }
        }
        (Value::Array(raw), Value::Array(typed)) if raw.len() == typed.len() => {
            for (index, (value, kept)) in raw.iter().zip(typed).enumerate() {
                lost_fields(value, kept, &join(&index.to_string()), lost);
            }
        }
        (raw, typed) if raw == typed || raw.is_null() => {}
        _ => lost.push(at.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> DraftSession {
        DraftSession::new("client-1", ContentDocument::blank()).unwrap()
    }

    #[test]
    fn test_successful_ticket_promotes() {
        let mut session = session();
        session.edit("global.logoUrl", "logo.png").unwrap();

        let ticket = session.begin_publish().unwrap();
        assert!(session.is_publishing());

        let report = session.finish_publish(ticket, Ok(())).unwrap();

        assert!(report.promoted);
        assert_eq!(report.status, DraftStatus::Clean);
        assert!(!session.is_publishing());
        assert_eq!(session.get_published("global.logoUrl"), Some(&json!("logo.png")));
        assert_eq!(session.published_document().global.logo_url, "logo.png");
    }

    #[test]
    fn test_failed_ticket_keeps_draft() {
        let mut session = session();
        session.edit("global.logoUrl", "logo.png").unwrap();

        let ticket = session.begin_publish().unwrap();
        let result = session.finish_publish(ticket, Err(StoreError::Transport("offline".into())));

        assert!(matches!(result, Err(EditorError::Store(_))));
        assert!(session.is_dirty());
        assert_eq!(session.get("global.logoUrl"), Some(&json!("logo.png")));
        assert_eq!(session.get_published("global.logoUrl"), Some(&json!("")));
        assert!(session.last_publish_error().unwrap().contains("offline"));
    }

    #[test]
    fn test_edits_during_flight_stay_dirty() {
        let mut session = session();
        session.edit("global.logoUrl", "one.png").unwrap();

        let ticket = session.begin_publish().unwrap();
        session.edit("global.logoUrl", "two.png").unwrap();

        let report = session.finish_publish(ticket, Ok(())).unwrap();

        assert_eq!(report.status, DraftStatus::Dirty);
        assert_eq!(session.get_published("global.logoUrl"), Some(&json!("one.png")));
        assert_eq!(session.get("global.logoUrl"), Some(&json!("two.png")));
    }

    #[test]
    fn test_stale_ticket_never_regresses() {
        let mut session = session();
        session.edit("global.logoUrl", "one.png").unwrap();
        let first = session.begin_publish().unwrap();
        session.edit("global.logoUrl", "two.png").unwrap();
        let second = session.begin_publish().unwrap();

        session.finish_publish(second, Ok(())).unwrap();
        let report = session.finish_publish(first, Ok(())).unwrap();

        assert!(!report.promoted);
        assert_eq!(report.status, DraftStatus::Clean);
        assert_eq!(session.get_published("global.logoUrl"), Some(&json!("two.png")));
    }

    #[test]
    fn test_ill_typed_working_copy_is_rejected() {
        let mut session = session();
        session.edit("global.logoUrl", json!({"not": "a string"})).unwrap();
        let before = session.working().clone();

        let result = session.begin_publish();

        assert!(matches!(result, Err(EditorError::PublishRejected(_))));
        assert_eq!(session.working(), &before);
        assert!(session.is_dirty());
        assert!(!session.is_publishing());
        assert!(session.last_publish_error().is_some());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut session = session();
        session.edit("aboutPage.banner.subtitle.en", "Only here").unwrap();
        session.edit("global.logoUrl", "logo.png").unwrap();

        let result = session.begin_publish();

        match result {
            Err(EditorError::PublishRejected(message)) => {
                assert!(message.contains("aboutPage.banner.subtitle"));
                assert!(!message.contains("logoUrl"));
            }
            other => panic!("expected rejection, got {:?}", other.map(|t| t.seq())),
        }
        assert_eq!(session.get("aboutPage.banner.subtitle.en"), Some(&json!("Only here")));
        assert!(!session.is_publishing());
    }

    #[test]
    fn test_promotion_fills_half_pairs() {
        let mut session = session();
        session.edit("homePage.welcome.slogan", json!({"en": "Grow"})).unwrap();

        let ticket = session.begin_publish().unwrap();
        let sent = ticket.document().to_value().unwrap();
        let report = session.finish_publish(ticket, Ok(())).unwrap();

        assert_eq!(report.status, DraftStatus::Clean);
        assert_eq!(session.published(), &sent);
        assert_eq!(session.working(), session.published());
        assert_eq!(
            session.get_published("homePage.welcome.slogan"),
            Some(&json!({"en": "Grow", "es": ""}))
        );
    }

    #[test]
    fn test_null_optional_field_is_not_lost() {
        let mut raw = json!({"a": {"b": null, "c": [1, 2]}});
        let typed = json!({"a": {"c": [1, 2], "d": ""}});
        let mut lost = Vec::new();
        lost_fields(&raw, &typed, "", &mut lost);
        assert!(lost.is_empty());

        raw["a"]["c"] = json!([1, 3]);
        lost_fields(&raw, &typed, "", &mut lost);
        assert_eq!(lost, vec!["a.c.1".to_string()]);
    }

    #[test]
    fn test_subscribers_see_promotion() {
        let mut session = session();
        let mut preview = session.subscribe_published();

        session.edit("global.logoUrl", "logo.png").unwrap();
        let ticket = session.begin_publish().unwrap();
        session.finish_publish(ticket, Ok(())).unwrap();

        assert!(preview.has_changed().unwrap());
        assert_eq!(preview.borrow_and_update().global.logo_url, "logo.png");
    }

    #[test]
    fn test_discard_clears_publish_error() {
        let mut session = session();
        session.edit("global.logoUrl", "logo.png").unwrap();
        let ticket = session.begin_publish().unwrap();
        let _ = session.finish_publish(ticket, Err(StoreError::Rejected("bad".into())));

        session.discard();
        assert_eq!(session.last_publish_error(), None);
    }
}

pub mod check;
pub mod edit;
pub mod init;
pub mod media;
pub mod show;

pub use check::{check, CheckArgs};
pub use edit::{add, edit, move_item, remove, AddArgs, EditArgs, MoveArgs, RemoveArgs};
pub use init::{init, InitArgs};
pub use media::{media, MediaCommand};
pub use show::{show, ShowArgs};

use crate::config::Config;
use anyhow::{Context as _, Result};
use colored::Colorize;
use serde_json::Value;
use std::path::PathBuf;
use verdant_editor::{DraftSession, EditorError, MutationEffect};
use verdant_store::{JsonFileContentStore, LocalMediaStore};

/// Working directory plus the effective configuration
pub struct Context {
    pub cwd: PathBuf,
    pub config: Config,
}

impl Context {
    pub fn store(&self) -> JsonFileContentStore {
        JsonFileContentStore::new(self.config.get_store_path(&self.cwd))
    }

    pub fn media(&self) -> LocalMediaStore {
        LocalMediaStore::new(
            self.config.get_media_root(&self.cwd),
            self.config.media_base_url.clone(),
        )
    }

    /// Open one editing session on the configured store
    pub async fn open_session(&self, store: &JsonFileContentStore) -> Result<DraftSession> {
        if !store.exists().await {
            anyhow::bail!(
                "No content store at {}. Run `verdant init` first",
                store.path().display()
            );
        }
        DraftSession::open("cli", store)
            .await
            .with_context(|| format!("Failed to load {}", store.path().display()))
    }
}

/// Command-line values: JSON when it parses, plain text otherwise
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Publish the session's edits, or skip when nothing changed
pub async fn publish_outcome(
    session: &mut DraftSession,
    store: &JsonFileContentStore,
    effect: &MutationEffect,
) -> Result<()> {
    if let MutationEffect::Noop { reason } = effect {
        println!("{} Nothing changed: {}", "⚠️".yellow(), reason);
        return Ok(());
    }

    match session.publish(store).await {
        Ok(report) => {
            println!(
                "  {} Published to {} (ticket {})",
                "✓".green(),
                store.path().display(),
                report.seq
            );
            Ok(())
        }
        Err(EditorError::PublishRejected(message)) => {
            anyhow::bail!("Edit produces an invalid document, not published: {}", message)
        }
        Err(e) => Err(anyhow::Error::new(e).context("Publish failed, edit not saved")),
    }
}

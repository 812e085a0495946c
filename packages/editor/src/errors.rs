//! Error types for the editor

use thiserror::Error;
use verdant_content::{PathError, StoreError};

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid path: {0}")]
    Path(#[from] PathError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Working copy does not form a valid document; nothing was sent
    #[error("Document rejected before publish: {0}")]
    PublishRejected(String),
}

//! # Verdant Store
//!
//! Backends for the editing core's collaborator contracts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ editor: publish(working)                    │
//! └─────────────────────────────────────────────┘
//!                     ↓ replace_document
//! ┌─────────────────────────────────────────────┐
//! │ store: Reconciler                           │
//! │  - diff incoming ids against stored rows    │
//! │  - delete (cascade) / update / insert       │
//! │  - page sections as JSON text               │
//! └─────────────────────────────────────────────┘
//!          ↓                         ↓
//! ┌──────────────────────┐  ┌──────────────────────┐
//! │ MemoryContentStore   │  │ JsonFileContentStore │
//! └──────────────────────┘  └──────────────────────┘
//! ```
//!
//! Media and notifications live beside the content store:
//! `LocalMediaStore` serves a directory tree, `OutboxNotifier` records
//! contact and donation messages.

mod file;
mod media;
mod memory;
mod notify;
mod reconcile;
mod tables;

pub use file::JsonFileContentStore;
pub use media::{normalize_dir, normalize_filename, LocalMediaStore, MediaPathError};
pub use memory::MemoryContentStore;
pub use notify::{OutboxEntry, OutboxNotifier};
pub use reconcile::{CollectionDiff, ReconcilePlan, Reconciler};
pub use tables::{ContentTables, Row, Table};

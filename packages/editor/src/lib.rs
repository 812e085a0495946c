//! # Verdant Editor
//!
//! Draft editing core of the Verdant admin panel.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ content: ContentDocument + paths + stores   │
//! └─────────────────────────────────────────────┘
//!                     ↓ fetch_document
//! ┌─────────────────────────────────────────────┐
//! │ editor: DraftSession                        │
//! │  - published (confirmed) / working (draft)  │
//! │  - path accessor edits on `working`         │
//! │  - ListEditor: add / remove / drag-reorder  │
//! │  - selections per list path                 │
//! └─────────────────────────────────────────────┘
//!                     ↓ replace_document
//! ┌─────────────────────────────────────────────┐
//! │ store: reconciliation into normalized rows  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Published only moves on confirmation**: a publish promotes the
//!    working copy after the store acknowledges it, never before
//! 2. **No shared structure**: the two copies are deep clones of each other
//! 3. **Misses are absent, not errors**: reading a missing path gives
//!    `None`, writing an unreachable one does nothing
//! 4. **One list editor**: every ordered collection goes through
//!    `ListEditor` on top of the session primitives
//!
//! ## Usage
//!
//! ```rust,ignore
//! use verdant_editor::DraftSession;
//!
//! let mut session = DraftSession::open("admin", &store).await?;
//!
//! session.edit("homePage.welcome.slogan.en", "Grow With Us")?;
//! let member = session.add_list_item("team", serde_json::json!({
//!     "name": { "en": "", "es": "" },
//! }))?;
//!
//! match session.publish(&store).await {
//!     Ok(report) => println!("published ticket {}", report.seq),
//!     Err(e) => eprintln!("still unsaved: {}", e),
//! }
//! ```

pub mod accessor;
mod errors;
mod ids;
mod list_editor;
mod mutations;
mod publish;
mod selection;
mod session;
mod ui_cache;

pub use errors::EditorError;
pub use ids::{session_seed, IdGenerator};
pub use list_editor::ListEditor;
pub use mutations::{Mutation, MutationEffect, MutationError};
pub use publish::{PublishReport, PublishTicket};
pub use selection::Selection;
pub use session::{DraftSession, DraftStatus, ListInsert};
pub use ui_cache::{UiContinuityCache, UiSnapshot};

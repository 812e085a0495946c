//! # Verdant Content
//!
//! Shape of the site's editable content and the contracts of the services
//! that store it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ content: typed document + paths + contracts │
//! │  - ContentDocument (pages + collections)    │
//! │  - ContentPath / ContentSchema              │
//! │  - ContentStore / MediaStore / Notification │
//! └─────────────────────────────────────────────┘
//!          ↓                         ↓
//! ┌──────────────────────┐  ┌──────────────────────┐
//! │ editor: draft session│  │ store: reconciliation│
//! └──────────────────────┘  └──────────────────────┘
//! ```

mod contracts;
mod items;
mod load;
mod localized;
mod model;
mod paths;

pub use contracts::{
    ContentStore, MediaFile, MediaListing, MediaStore, Notification, NotificationChannel,
    StoreError,
};
pub use items::{Collection, ListItem};
pub use load::{load_lenient, section, LoadReport, SectionFault};
pub use localized::{Language, LocalizedText};
pub use model::*;
pub use paths::{
    is_index_segment, parse_index, split_path, ContentPath, ContentSchema, NodeKind, PathError,
    Segment,
};

//! UI continuity cache: where the admin was (tab, scroll, open items) so a
//! reload can put them back. Kept beside the document, never inside it; the
//! only thing a restore touches is selection state.

use crate::session::DraftSession;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiSnapshot {
    pub active_tab: Option<String>,
    pub scroll_offset: u32,
    /// Selected index per list path
    pub selections: BTreeMap<String, usize>,
}

/// Snapshots keyed by session id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiContinuityCache {
    snapshots: HashMap<String, UiSnapshot>,
}

impl UiContinuityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the session's selections with the given presentation state
    pub fn capture(&mut self, session: &DraftSession, active_tab: Option<&str>, scroll_offset: u32) {
        let selections = session
            .selections()
            .filter_map(|(path, index)| index.map(|i| (path.to_string(), i)))
            .collect();

        self.snapshots.insert(
            session.id.clone(),
            UiSnapshot {
                active_tab: active_tab.map(str::to_string),
                scroll_offset,
                selections,
            },
        );
    }

    pub fn snapshot(&self, session_id: &str) -> Option<&UiSnapshot> {
        self.snapshots.get(session_id)
    }

    /// Put saved selections back, clamped into the current lists
    pub fn restore(&self, session: &mut DraftSession) -> Option<&UiSnapshot> {
        let snapshot = self.snapshots.get(&session.id)?;

        for (path, index) in &snapshot.selections {
            let len = session.list_len(path);
            let index = (len > 0).then(|| (*index).min(len - 1));
            session.select(path, index);
        }

        tracing::debug!(
            "[{}] restored {} selections",
            session.id,
            snapshot.selections.len()
        );
        Some(snapshot)
    }

    pub fn forget(&mut self, session_id: &str) -> Option<UiSnapshot> {
        self.snapshots.remove(session_id)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

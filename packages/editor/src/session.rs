//! # Draft Editing Session
//!
//! Holds the working copy being edited next to the last confirmed
//! (published) copy.
//!
//! ```text
//!            edit / add / remove / move
//!   ┌───────┐ ─────────────────────────▶ ┌───────┐
//!   │ Clean │                            │ Dirty │ ◀─┐ failed publish
//!   └───────┘ ◀───────────────────────── └───────┘ ──┘
//!              discard / successful publish
//! ```
//!
//! The two copies never share structure: every hand-over between them is a
//! deep clone, and `published` only changes through a successful publish.

use crate::accessor;
use crate::mutations::{Mutation, MutationEffect, MutationError};
use crate::publish::PublishState;
use crate::{EditorError, IdGenerator, Selection};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::watch;
use verdant_content::{ContentDocument, ContentPath, ContentSchema, ContentStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftStatus {
    /// Working copy matches the published copy
    Clean,
    /// Working copy has edits that are not published
    Dirty,
}

/// Position and id of a freshly added list item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListInsert {
    pub index: usize,
    /// `None` for scalar items (e.g. image URL lists)
    pub id: Option<String>,
}

/// Single-user editing session over one content document
pub struct DraftSession {
    /// Unique session identifier
    pub id: String,

    pub(crate) published: Value,
    pub(crate) working: Value,
    pub(crate) status: DraftStatus,

    /// Increments on every applied mutation and on discard
    pub(crate) version: u64,

    ids: IdGenerator,

    /// Selection per list path, for attached list editors
    selections: BTreeMap<String, Selection>,

    pub(crate) publish: PublishState,
    pub(crate) published_tx: watch::Sender<Arc<ContentDocument>>,
}

impl DraftSession {
    /// Start a session seeded from a confirmed document
    pub fn new(id: impl Into<String>, document: ContentDocument) -> Result<Self, EditorError> {
        let published = document.to_value()?;
        let (published_tx, _) = watch::channel(Arc::new(document));

        Ok(Self {
            id: id.into(),
            working: published.clone(),
            published,
            status: DraftStatus::Clean,
            version: 0,
            ids: IdGenerator::new(),
            selections: BTreeMap::new(),
            publish: PublishState::default(),
            published_tx,
        })
    }

    /// Fetch the stored document and start a session on it
    pub async fn open<S: ContentStore + ?Sized>(
        id: impl Into<String>,
        store: &S,
    ) -> Result<Self, EditorError> {
        let id = id.into();
        let document = store.fetch_document().await?;
        tracing::info!(
            "[{}] session opened ({} projects, {} team members, {} posts)",
            id,
            document.projects.len(),
            document.team.len(),
            document.blog.len()
        );
        Self::new(id, document)
    }

    /// Replace the id generator (deterministic ids in tests and replays)
    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    pub fn working(&self) -> &Value {
        &self.working
    }

    pub fn published(&self) -> &Value {
        &self.published
    }

    /// Value at `path` in the working copy
    pub fn get(&self, path: &str) -> Option<&Value> {
        accessor::get(&self.working, path)
    }

    /// Value at `path` in the published copy
    pub fn get_published(&self, path: &str) -> Option<&Value> {
        accessor::get(&self.published, path)
    }

    /// Typed view of the working copy
    pub fn working_document(&self) -> Result<ContentDocument, EditorError> {
        Ok(ContentDocument::from_value(self.working.clone())?)
    }

    /// Typed view of the published copy
    pub fn published_document(&self) -> Arc<ContentDocument> {
        self.published_tx.borrow().clone()
    }

    /// Receiver that always holds the latest published document (live preview)
    pub fn subscribe_published(&self) -> watch::Receiver<Arc<ContentDocument>> {
        self.published_tx.subscribe()
    }

    pub fn status(&self) -> DraftStatus {
        self.status
    }

    pub fn is_dirty(&self) -> bool {
        self.status == DraftStatus::Dirty
    }

    /// Structural comparison of the two copies
    pub fn has_changes(&self) -> bool {
        self.working != self.published
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Apply a mutation to the working copy
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationEffect, EditorError> {
        let effect = mutation.apply(&mut self.working)?;
        let path = mutation.path();

        match &effect {
            MutationEffect::Noop { reason } => {
                tracing::debug!("[{}] no-op at '{}': {}", self.id, path, reason);
                return Ok(effect);
            }
            MutationEffect::Updated => {
                // Replacing a whole list (or an ancestor) reshapes it
                let len = self.list_len(path);
                if let Some(selection) = self.selections.get_mut(path) {
                    selection.clamp(len);
                }
                self.reset_nested_selections(path);
            }
            MutationEffect::Inserted { index } => {
                if let Some(selection) = self.selections.get_mut(path) {
                    selection.after_insert(*index);
                }
            }
            MutationEffect::Removed { index, .. } => {
                let len = self.list_len(path);
                if let Some(selection) = self.selections.get_mut(path) {
                    selection.after_remove(*index, len);
                }
                self.reset_nested_selections(path);
            }
            MutationEffect::Moved { from, to } => {
                if let Some(selection) = self.selections.get_mut(path) {
                    selection.after_move(*from, *to);
                }
                self.reset_nested_selections(path);
            }
        }

        self.version += 1;
        self.status = DraftStatus::Dirty;
        tracing::debug!("[{}] v{} {:?} at '{}'", self.id, self.version, effect, path);

        Ok(effect)
    }

    /// Set the value at `path` (raw string path, missing containers created)
    pub fn edit(&mut self, path: &str, value: impl Into<Value>) -> Result<MutationEffect, EditorError> {
        self.apply(Mutation::set_field(path, value))
    }

    /// Set the value at a path checked against the document shape first
    pub fn edit_checked(
        &mut self,
        path: &ContentPath,
        value: impl Into<Value>,
    ) -> Result<MutationEffect, EditorError> {
        ContentSchema::shared().validate(path)?;
        self.edit(&path.to_string(), value)
    }

    /// Append a new item built from `template` to the list at `path`.
    ///
    /// Record templates get a fresh id, unique within the list; any id in
    /// the template is replaced. The new item becomes the list's selection.
    pub fn add_list_item(&mut self, path: &str, template: Value) -> Result<ListInsert, EditorError> {
        let mut item = template;

        let id = match &mut item {
            Value::Object(map) => {
                let taken: HashSet<&str> = accessor::list(&self.working, path)
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|i| i.get("id").and_then(Value::as_str))
                            .collect()
                    })
                    .unwrap_or_default();
                let id = self.ids.fresh_id(|candidate| taken.contains(candidate));
                map.insert("id".to_string(), Value::String(id.clone()));
                Some(id)
            }
            _ => None,
        };

        match self.apply(Mutation::AddItem {
            path: path.to_string(),
            item,
        })? {
            MutationEffect::Inserted { index } => Ok(ListInsert { index, id }),
            _ => Err(MutationError::NotAList {
                path: path.to_string(),
            }
            .into()),
        }
    }

    /// Delete the item at `index`; `None` when there was nothing to delete
    pub fn remove_list_item(&mut self, path: &str, index: usize) -> Result<Option<Value>, EditorError> {
        match self.apply(Mutation::RemoveItem {
            path: path.to_string(),
            index,
        })? {
            MutationEffect::Removed { item, .. } => Ok(Some(item)),
            _ => Ok(None),
        }
    }

    /// Relocate an item; `false` for drop-on-self or out-of-range indices
    pub fn move_list_item(&mut self, path: &str, from: usize, to: usize) -> Result<bool, EditorError> {
        let effect = self.apply(Mutation::MoveItem {
            path: path.to_string(),
            from,
            to,
        })?;
        Ok(matches!(effect, MutationEffect::Moved { .. }))
    }

    /// Throw away every unpublished edit
    pub fn discard(&mut self) {
        self.working = self.published.clone();
        self.status = DraftStatus::Clean;
        self.version += 1;
        self.publish.last_error = None;

        let lengths: Vec<(String, usize)> = self
            .selections
            .keys()
            .map(|path| (path.clone(), self.list_len(path)))
            .collect();
        for (path, len) in lengths {
            if let Some(selection) = self.selections.get_mut(&path) {
                selection.clamp(len);
            }
        }

        tracing::info!("[{}] discarded edits (v{})", self.id, self.version);
    }

    /// Number of elements of the list at `path` (0 when absent)
    pub fn list_len(&self, path: &str) -> usize {
        accessor::list(&self.working, path).map_or(0, Vec::len)
    }

    /// Track a selection for the list at `path`
    pub fn attach_selection(&mut self, path: &str) {
        self.selections.entry(path.to_string()).or_default();
    }

    pub fn detach_selection(&mut self, path: &str) {
        self.selections.remove(path);
    }

    pub fn selection(&self, path: &str) -> Option<usize> {
        self.selections.get(path).and_then(Selection::index)
    }

    /// Select an item by position; out-of-range indices clear the selection
    pub fn select(&mut self, path: &str, index: Option<usize>) {
        let len = self.list_len(path);
        let selection = self.selections.entry(path.to_string()).or_default();
        selection.set(index.filter(|i| *i < len));
    }

    /// Every tracked selection, keyed by list path
    pub fn selections(&self) -> impl Iterator<Item = (&str, Option<usize>)> {
        self.selections
            .iter()
            .map(|(path, selection)| (path.as_str(), selection.index()))
    }

    /// Nested list positions under a reshaped list no longer mean the same item
    fn reset_nested_selections(&mut self, path: &str) {
        let prefix = format!("{}.", path);
        for (key, selection) in self.selections.iter_mut() {
            if key.starts_with(&prefix) {
                selection.set(None);
            }
        }
    }
}

//! # Collection List Editor
//!
//! One generic editor for every ordered list in the document (projects,
//! team, hero slides, nav links, ...). It owns no items: reads go through
//! the session's working copy and every edit is a session primitive, so
//! selection bookkeeping and Dirty tracking stay in one place.
//!
//! ## Drag Gesture
//!
//! `begin_drag(source)` → `drag_enter(target)`* → `end_drag()`. On end, a
//! gesture whose target differs from its source becomes one `move_list_item`
//! and the moved item is selected. Drop-on-self does nothing.

use crate::mutations::MutationEffect;
use crate::session::{DraftSession, ListInsert};
use crate::EditorError;
use serde_json::Value;
use std::marker::PhantomData;
use verdant_content::{Collection, Language, ListItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragGesture {
    source: usize,
    target: usize,
}

pub struct ListEditor<T: ListItem> {
    path: String,
    entity: &'static str,
    language: Language,
    reorderable: bool,
    drag: Option<DragGesture>,
    _item: PhantomData<fn() -> T>,
}

impl<T: ListItem> ListEditor<T> {
    /// Editor over the list at `path`, with a selection tracked by `session`
    pub fn new(session: &mut DraftSession, path: impl Into<String>) -> Self {
        let path = path.into();
        session.attach_selection(&path);

        Self {
            path,
            entity: T::ENTITY,
            language: Language::default(),
            reorderable: true,
            drag: None,
            _item: PhantomData,
        }
    }

    pub fn for_collection(session: &mut DraftSession, collection: Collection) -> Self {
        let mut editor = Self::new(session, collection.path().to_string());
        editor.entity = collection.entity_name();
        editor
    }

    /// Language used for tab titles
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn reorderable(mut self, reorderable: bool) -> Self {
        self.reorderable = reorderable;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn entity_name(&self) -> &'static str {
        self.entity
    }

    /// Path of the item at `index`
    pub fn item_path(&self, index: usize) -> String {
        format!("{}.{}", self.path, index)
    }

    pub fn len(&self, session: &DraftSession) -> usize {
        session.list_len(&self.path)
    }

    pub fn is_empty(&self, session: &DraftSession) -> bool {
        self.len(session) == 0
    }

    /// Items of the working copy; elements that don't fit `T` read as defaults
    pub fn items(&self, session: &DraftSession) -> Vec<T> {
        crate::accessor::list(session.working(), &self.path)
            .map(|items| items.iter().map(decode_lenient).collect())
            .unwrap_or_default()
    }

    pub fn item(&self, session: &DraftSession, index: usize) -> Option<T> {
        session.get(&self.item_path(index)).map(decode_lenient)
    }

    /// Tab title: the item's label, or "Item N" when it has none
    pub fn title(&self, session: &DraftSession, index: usize) -> String {
        self.item(session, index)
            .as_ref()
            .and_then(|item| item.label(self.language))
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Item {}", index + 1))
    }

    pub fn titles(&self, session: &DraftSession) -> Vec<String> {
        (0..self.len(session)).map(|i| self.title(session, i)).collect()
    }

    pub fn selected_index(&self, session: &DraftSession) -> Option<usize> {
        session
            .selection(&self.path)
            .filter(|i| *i < self.len(session))
    }

    pub fn selected(&self, session: &DraftSession) -> Option<T> {
        self.selected_index(session)
            .and_then(|i| self.item(session, i))
    }

    pub fn select(&self, session: &mut DraftSession, index: Option<usize>) {
        session.select(&self.path, index);
    }

    /// Append `template` with a fresh id and select it
    pub fn add(&self, session: &mut DraftSession, template: T) -> Result<ListInsert, EditorError> {
        let template = serde_json::to_value(template)?;
        session.add_list_item(&self.path, template)
    }

    /// Append a blank item
    pub fn add_default(&self, session: &mut DraftSession) -> Result<ListInsert, EditorError> {
        self.add(session, T::default())
    }

    pub fn remove(&self, session: &mut DraftSession, index: usize) -> Result<Option<T>, EditorError> {
        let removed = session.remove_list_item(&self.path, index)?;
        Ok(removed.as_ref().map(decode_lenient))
    }

    /// Remove the item currently open in the editor
    pub fn remove_selected(&self, session: &mut DraftSession) -> Result<Option<T>, EditorError> {
        match self.selected_index(session) {
            Some(index) => self.remove(session, index),
            None => Ok(None),
        }
    }

    /// Set one field of the item at `index` (`field` may be a dotted sub-path)
    pub fn edit_field(
        &self,
        session: &mut DraftSession,
        index: usize,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<MutationEffect, EditorError> {
        session.edit(&format!("{}.{}", self.item_path(index), field), value)
    }

    pub fn begin_drag(&mut self, index: usize) {
        if self.reorderable {
            self.drag = Some(DragGesture {
                source: index,
                target: index,
            });
        }
    }

    pub fn drag_enter(&mut self, index: usize) {
        if let Some(drag) = self.drag.as_mut() {
            drag.target = index;
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Finish the gesture; `true` when the list was reordered
    pub fn end_drag(&mut self, session: &mut DraftSession) -> Result<bool, EditorError> {
        let Some(drag) = self.drag.take() else {
            return Ok(false);
        };
        if drag.source == drag.target {
            return Ok(false);
        }

        let moved = session.move_list_item(&self.path, drag.source, drag.target)?;
        if moved {
            // The dropped item is selected even when another (or none) was
            session.select(&self.path, Some(drag.target));
        }
        Ok(moved)
    }
}

fn decode_lenient<T: ListItem>(value: &Value) -> T {
    serde_json::from_value(value.clone()).unwrap_or_else(|e| {
        tracing::debug!("list item does not match {}: {}", T::ENTITY, e);
        T::default()
    })
}

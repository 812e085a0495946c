//! # Content Mutations
//!
//! The four edits the admin panel can make to a working copy.
//!
//! ## Mutation Semantics
//!
//! ### SetField
//! - Atomic replacement of the value at a path
//! - Missing containers are created on the way (see `accessor::set`)
//! - Unreachable targets are a no-op, not an error
//!
//! ### AddItem
//! - Appends a fully formed item (id already assigned) to a list
//! - A missing list is created; a non-list (or unreachable) path is an error
//!
//! ### RemoveItem
//! - Unconditional once issued; confirmation happens at the UI boundary
//! - Out-of-range index is a no-op
//!
//! ### MoveItem
//! - Single splice-out/splice-in relocation
//! - Drop-on-self and out-of-range indices are no-ops

use crate::accessor;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use verdant_content::{ContentPath, ContentSchema, PathError};

/// Edit of the working copy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mutation {
    /// Replace the value at `path`
    SetField { path: String, value: Value },

    /// Append `item` to the list at `path`
    AddItem { path: String, item: Value },

    /// Delete the element at `index` of the list at `path`
    RemoveItem { path: String, index: usize },

    /// Relocate an element of the list at `path`
    MoveItem { path: String, from: usize, to: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Not a list: {path}")]
    NotAList { path: String },
}

/// What a mutation did to the tree
#[derive(Debug, Clone, PartialEq)]
pub enum MutationEffect {
    Updated,
    Inserted { index: usize },
    Removed { index: usize, item: Value },
    Moved { from: usize, to: usize },
    /// Nothing changed (unreachable path, out-of-range index, drop-on-self)
    Noop { reason: String },
}

impl MutationEffect {
    pub fn is_noop(&self) -> bool {
        matches!(self, MutationEffect::Noop { .. })
    }
}

impl Mutation {
    pub fn set_field(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Mutation::SetField {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Path the mutation targets (the list itself for list edits)
    pub fn path(&self) -> &str {
        match self {
            Mutation::SetField { path, .. }
            | Mutation::AddItem { path, .. }
            | Mutation::RemoveItem { path, .. }
            | Mutation::MoveItem { path, .. } => path,
        }
    }

    /// True for edits that change list length or order
    pub fn is_structural(&self) -> bool {
        !matches!(self, Mutation::SetField { .. })
    }

    /// Check the target path against the known document shape
    pub fn validate(&self, schema: &ContentSchema) -> Result<(), PathError> {
        let path: ContentPath = self.path().parse()?;
        match self {
            Mutation::SetField { .. } => schema.validate(&path).map(|_| ()),
            // List edits are checked through their first element's slot
            _ => schema.validate(&path.index(0)).map(|_| ()),
        }
    }

    /// Apply to a content tree
    pub fn apply(&self, tree: &mut Value) -> Result<MutationEffect, MutationError> {
        match self {
            Mutation::SetField { path, value } => Ok(Self::apply_set(tree, path, value)),
            Mutation::AddItem { path, item } => Self::apply_add(tree, path, item),
            Mutation::RemoveItem { path, index } => Self::apply_remove(tree, path, *index),
            Mutation::MoveItem { path, from, to } => Self::apply_move(tree, path, *from, *to),
        }
    }

    fn apply_set(tree: &mut Value, path: &str, value: &Value) -> MutationEffect {
        if accessor::set(tree, path, value.clone()) {
            MutationEffect::Updated
        } else {
            MutationEffect::Noop {
                reason: format!("path '{}' is unreachable", path),
            }
        }
    }

    fn apply_add(tree: &mut Value, path: &str, item: &Value) -> Result<MutationEffect, MutationError> {
        let missing = matches!(accessor::get(tree, path), None | Some(Value::Null));
        if missing && !accessor::set(tree, path, Value::Array(Vec::new())) {
            return Err(MutationError::NotAList {
                path: path.to_string(),
            });
        }

        let list = accessor::list_mut(tree, path).ok_or_else(|| MutationError::NotAList {
            path: path.to_string(),
        })?;
        list.push(item.clone());

        Ok(MutationEffect::Inserted {
            index: list.len() - 1,
        })
    }

    fn apply_remove(tree: &mut Value, path: &str, index: usize) -> Result<MutationEffect, MutationError> {
        let list = match accessor::get_mut(tree, path) {
            None | Some(Value::Null) => {
                return Ok(MutationEffect::Noop {
                    reason: format!("list '{}' does not exist", path),
                })
            }
            Some(Value::Array(list)) => list,
            Some(_) => {
                return Err(MutationError::NotAList {
                    path: path.to_string(),
                })
            }
        };

        match accessor::delete_at(list, index) {
            Some(item) => Ok(MutationEffect::Removed { index, item }),
            None => Ok(MutationEffect::Noop {
                reason: format!("index {} out of range for '{}'", index, path),
            }),
        }
    }

    fn apply_move(
        tree: &mut Value,
        path: &str,
        from: usize,
        to: usize,
    ) -> Result<MutationEffect, MutationError> {
        if from == to {
            return Ok(MutationEffect::Noop {
                reason: "drop on self".to_string(),
            });
        }

        let list = match accessor::get_mut(tree, path) {
            None | Some(Value::Null) => {
                return Ok(MutationEffect::Noop {
                    reason: format!("list '{}' does not exist", path),
                })
            }
            Some(Value::Array(list)) => list,
            Some(_) => {
                return Err(MutationError::NotAList {
                    path: path.to_string(),
                })
            }
        };

        if accessor::move_item(list, from, to) {
            Ok(MutationEffect::Moved { from, to })
        } else {
            Ok(MutationEffect::Noop {
                reason: format!("move {} -> {} out of range for '{}'", from, to, path),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::MoveItem {
            path: "team".to_string(),
            from: 0,
            to: 2,
        };

        let json = serde_json::to_value(&mutation).unwrap();
        assert_eq!(json, json!({"type": "moveItem", "path": "team", "from": 0, "to": 2}));

        let deserialized: Mutation = serde_json::from_value(json).unwrap();
        assert_eq!(mutation, deserialized);
    }

    #[test]
    fn test_add_item_creates_missing_list() {
        let mut tree = json!({});
        let effect = Mutation::AddItem {
            path: "homePage.heroSlides".to_string(),
            item: json!({"id": "s1"}),
        }
        .apply(&mut tree)
        .unwrap();

        assert_eq!(effect, MutationEffect::Inserted { index: 0 });
        assert_eq!(tree["homePage"]["heroSlides"], json!([{"id": "s1"}]));
    }

    #[test]
    fn test_add_item_on_record_fails() {
        let mut tree = json!({"homePage": {"welcome": {}}});
        let result = Mutation::AddItem {
            path: "homePage.welcome".to_string(),
            item: json!({}),
        }
        .apply(&mut tree);

        assert!(matches!(result, Err(MutationError::NotAList { .. })));
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut tree = json!({"team": [{"id": "t1"}]});
        let effect = Mutation::RemoveItem {
            path: "team".to_string(),
            index: 4,
        }
        .apply(&mut tree)
        .unwrap();

        assert!(effect.is_noop());
        assert_eq!(tree["team"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_move_reorders() {
        let mut tree = json!({"team": [{"id": "A"}, {"id": "B"}, {"id": "C"}]});
        let effect = Mutation::MoveItem {
            path: "team".to_string(),
            from: 0,
            to: 2,
        }
        .apply(&mut tree)
        .unwrap();

        assert_eq!(effect, MutationEffect::Moved { from: 0, to: 2 });
        assert_eq!(tree["team"], json!([{"id": "B"}, {"id": "C"}, {"id": "A"}]));
    }

    #[test]
    fn test_validate_against_schema() {
        let schema = ContentSchema::shared();

        assert!(Mutation::set_field("homePage.welcome.slogan.en", "x")
            .validate(schema)
            .is_ok());
        assert!(Mutation::set_field("homePage.welcom.slogan.en", "x")
            .validate(schema)
            .is_err());
        assert!(Mutation::RemoveItem {
            path: "projects.1.activities".to_string(),
            index: 0
        }
        .validate(schema)
        .is_ok());
        assert!(Mutation::AddItem {
            path: "homePage.welcome".to_string(),
            item: json!({})
        }
        .validate(schema)
        .is_err());
    }
}

//! # Path Accessor
//!
//! Generic get/set over a content tree addressed by dotted paths.
//!
//! ## Semantics
//!
//! ### get
//! - Walks segment by segment; numeric segments index into lists
//! - Missing or wrong-shaped intermediates resolve to `None`, never an error
//!
//! ### set
//! - Mutates the tree in place
//! - Missing (or null) intermediates are created: a list when the next
//!   segment is an index literal, a record otherwise
//! - A list index may address an existing element or the slot right after
//!   the last one (append); anything further is out of reach
//! - Unreachable targets are a no-op and leave the tree untouched
//!
//! ### List edits
//! - `move_item` is one splice-out/splice-in, not a swap

use serde_json::{Map, Value};
use verdant_content::{is_index_segment, parse_index, split_path};

/// Resolve `path` against `tree`
pub fn get<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    let mut node = tree;
    for segment in split_path(path) {
        node = step(node, segment)?;
    }
    Some(node)
}

/// Mutable variant of [`get`]; never creates anything
pub fn get_mut<'a>(tree: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    let mut node = tree;
    for segment in split_path(path) {
        node = match node {
            Value::Object(map) => map.get_mut(segment)?,
            Value::Array(items) => items.get_mut(parse_index(segment)?)?,
            _ => return None,
        };
    }
    Some(node)
}

/// String at `path`, or `""` when absent or not a string
pub fn get_str<'a>(tree: &'a Value, path: &str) -> &'a str {
    get(tree, path).and_then(Value::as_str).unwrap_or("")
}

/// List at `path`, or `None` when absent or not a list
pub fn list<'a>(tree: &'a Value, path: &str) -> Option<&'a Vec<Value>> {
    get(tree, path).and_then(Value::as_array)
}

/// Mutable list at `path`
pub fn list_mut<'a>(tree: &'a mut Value, path: &str) -> Option<&'a mut Vec<Value>> {
    get_mut(tree, path).and_then(Value::as_array_mut)
}

fn step<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => items.get(parse_index(segment)?),
        _ => None,
    }
}

/// Write `value` at `path`, creating missing containers on the way.
///
/// Returns `false` (and leaves `tree` unchanged) when the target cannot be
/// reached.
pub fn set(tree: &mut Value, path: &str, value: Value) -> bool {
    let segments: Vec<&str> = split_path(path).collect();
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };

    if !reachable(tree, &segments) {
        return false;
    }

    let mut node = tree;
    for (i, segment) in parents.iter().enumerate() {
        let next_is_index = is_index_segment(segments[i + 1]);
        node = match vivify(node, segment, next_is_index) {
            Some(child) => child,
            None => return false,
        };
    }
    assign(node, last, value)
}

/// Dry run of [`set`]: would every segment resolve or be creatable?
fn reachable(tree: &Value, segments: &[&str]) -> bool {
    // `None` means "inside a container that set() would create"
    let mut node = Some(tree);

    for segment in segments {
        node = match node {
            Some(Value::Object(map)) => map.get(*segment).filter(|v| !v.is_null()),
            Some(Value::Array(items)) => {
                let Some(index) = parse_index(segment) else {
                    return false;
                };
                if index > items.len() {
                    return false;
                }
                items.get(index).filter(|v| !v.is_null())
            }
            Some(_) => return false,
            None => {
                // A created list starts empty, so only slot 0 is reachable
                if is_index_segment(segment) && parse_index(segment) != Some(0) {
                    return false;
                }
                None
            }
        };
    }
    true
}

fn empty_container(as_list: bool) -> Value {
    if as_list {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

fn vivify<'a>(node: &'a mut Value, segment: &str, next_is_index: bool) -> Option<&'a mut Value> {
    let child = match node {
        Value::Object(map) => map
            .entry(segment.to_string())
            .or_insert_with(|| empty_container(next_is_index)),
        Value::Array(items) => {
            let index = parse_index(segment)?;
            if index == items.len() {
                items.push(empty_container(next_is_index));
            }
            items.get_mut(index)?
        }
        _ => return None,
    };
    if child.is_null() {
        *child = empty_container(next_is_index);
    }
    Some(child)
}

fn assign(node: &mut Value, segment: &str, value: Value) -> bool {
    match node {
        Value::Object(map) => {
            map.insert(segment.to_string(), value);
            true
        }
        Value::Array(items) => match parse_index(segment) {
            Some(index) if index < items.len() => {
                items[index] = value;
                true
            }
            Some(index) if index == items.len() => {
                items.push(value);
                true
            }
            _ => false,
        },
        _ => false,
    }
}

/// Remove and return the element at `index`
pub fn delete_at(list: &mut Vec<Value>, index: usize) -> Option<Value> {
    if index < list.len() {
        Some(list.remove(index))
    } else {
        None
    }
}

/// Insert `item` at `index` (clamped to the end), returning the final position
pub fn insert_at(list: &mut Vec<Value>, index: usize, item: Value) -> usize {
    let index = index.min(list.len());
    list.insert(index, item);
    index
}

/// Relocate the element at `from` to `to`, shifting the elements between.
///
/// Returns `false` when either index is out of range.
pub fn move_item<T>(list: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= list.len() || to >= list.len() {
        return false;
    }
    if from != to {
        let item = list.remove(from);
        list.insert(to, item);
    }
    true
}

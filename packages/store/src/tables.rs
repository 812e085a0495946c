//! # Normalized Tables
//!
//! Storage layout of a content document:
//!
//! ```text
//! sections      name → JSON text     global, ui, homePage, ... donatePage
//! projects      id → row             project without its activities
//! activities    project id → id → row
//! team          id → row
//! blog          id → row
//! ```
//!
//! Every row carries the `displayOrder` it had in its list. Assembling a
//! document sorts rows by it; ties fall back to id order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use verdant_content::{
    section, BlogPost, ContentDocument, LoadReport, Project, ProjectActivity, SectionFault,
    StoreError, TeamMember, PAGE_SECTIONS,
};

/// A stored list element with its position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row<T> {
    #[serde(flatten)]
    pub data: T,
    pub display_order: usize,
}

impl<T> Row<T> {
    pub fn new(data: T, display_order: usize) -> Self {
        Self {
            data,
            display_order,
        }
    }
}

pub type Table<T> = BTreeMap<String, Row<T>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentTables {
    /// Page sections as JSON text, keyed by section name
    pub sections: BTreeMap<String, String>,
    /// Projects with `activities` left empty
    pub projects: Table<Project>,
    /// Activities grouped by owning project id
    pub activities: BTreeMap<String, Table<ProjectActivity>>,
    pub team: Table<TeamMember>,
    pub blog: Table<BlogPost>,
}

impl ContentTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the page sections of `document` as JSON text
    pub fn write_sections(&mut self, document: &ContentDocument) -> Result<(), StoreError> {
        let value = document.to_value()?;
        for name in PAGE_SECTIONS {
            let text = match value.get(name) {
                Some(section) => serde_json::to_string(section)?,
                None => "{}".to_string(),
            };
            self.sections.insert(name.to_string(), text);
        }
        Ok(())
    }

    /// Rebuild the document. Sections whose JSON text does not parse (or
    /// does not fit the model) come back blank and are reported as faults.
    pub fn assemble(&self) -> LoadReport {
        let mut faults = Vec::new();
        let mut root = Map::new();

        for name in PAGE_SECTIONS {
            let Some(text) = self.sections.get(name) else {
                continue;
            };
            match serde_json::from_str::<Value>(text) {
                Ok(value) => {
                    root.insert(name.to_string(), value);
                }
                Err(e) => faults.push(SectionFault {
                    section: name.to_string(),
                    message: e.to_string(),
                }),
            }
        }

        for fault in &faults {
            tracing::warn!(
                "Stored section '{}' is not valid JSON, using blank default: {}",
                fault.section,
                fault.message
            );
        }

        let mut report = verdant_content::load_lenient(Value::Object(root));
        faults.append(&mut report.faults);
        report.faults = faults;

        report.document.projects = ordered(&self.projects)
            .into_iter()
            .map(|mut project| {
                project.activities = self
                    .activities
                    .get(&project.id)
                    .map(ordered)
                    .unwrap_or_default();
                project
            })
            .collect();
        report.document.team = ordered(&self.team);
        report.document.blog = ordered(&self.blog);

        report
    }

    /// Decode a single stored section, for callers that only need one page
    pub fn section<T: serde::de::DeserializeOwned + Default>(&self, name: &str) -> (T, Option<SectionFault>) {
        let mut faults = Vec::new();
        let raw = self
            .sections
            .get(name)
            .and_then(|text| match serde_json::from_str::<Value>(text) {
                Ok(value) => Some(value),
                Err(e) => {
                    faults.push(SectionFault {
                        section: name.to_string(),
                        message: e.to_string(),
                    });
                    None
                }
            });
        let value = section(&mut faults, name, raw);
        (value, faults.pop())
    }

    pub fn activity_count(&self) -> usize {
        self.activities.values().map(BTreeMap::len).sum()
    }
}

/// Rows sorted by display order, ties broken by id
fn ordered<T: Clone>(table: &Table<T>) -> Vec<T> {
    let mut rows: Vec<(&String, &Row<T>)> = table.iter().collect();
    rows.sort_by(|(a_id, a), (b_id, b)| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a_id.cmp(b_id))
    });
    rows.into_iter().map(|(_, row)| row.data.clone()).collect()
}

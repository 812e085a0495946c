//! Section-tolerant document loading.
//!
//! Each top-level section is decoded on its own. A section that fails to
//! decode is replaced by its blank default, so one corrupted page blob does
//! not keep the rest of the site from loading.

use crate::ContentDocument;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A section that could not be decoded and was replaced by its default
#[derive(Debug, Clone, PartialEq)]
pub struct SectionFault {
    pub section: String,
    pub message: String,
}

/// Decoded document plus the sections that fell back to defaults
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub document: ContentDocument,
    pub faults: Vec<SectionFault>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Decode a document, substituting defaults section by section
pub fn load_lenient(value: Value) -> LoadReport {
    let mut faults = Vec::new();

    let mut sections = match value {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            faults.push(SectionFault {
                section: String::new(),
                message: format!("document root is not an object: {}", type_name(&other)),
            });
            Map::new()
        }
    };

    let mut take = |name: &str| sections.remove(name);
    let mut document = ContentDocument::blank();

    document.global = section(&mut faults, "global", take("global"));
    document.ui = section(&mut faults, "ui", take("ui"));
    document.home_page = section(&mut faults, "homePage", take("homePage"));
    document.about_page = section(&mut faults, "aboutPage", take("aboutPage"));
    document.projects_page = section(&mut faults, "projectsPage", take("projectsPage"));
    document.project_detail_page =
        section(&mut faults, "projectDetailPage", take("projectDetailPage"));
    document.team_page = section(&mut faults, "teamPage", take("teamPage"));
    document.blog_page = section(&mut faults, "blogPage", take("blogPage"));
    document.contact_page = section(&mut faults, "contactPage", take("contactPage"));
    document.donate_page = section(&mut faults, "donatePage", take("donatePage"));
    document.projects = section(&mut faults, "projects", take("projects"));
    document.team = section(&mut faults, "team", take("team"));
    document.blog = section(&mut faults, "blog", take("blog"));

    for fault in &faults {
        tracing::warn!(
            "Content section '{}' failed to load, using blank default: {}",
            fault.section,
            fault.message
        );
    }

    LoadReport { document, faults }
}

/// Decode a single section; absent or null means default without a fault
pub fn section<T: DeserializeOwned + Default>(
    faults: &mut Vec<SectionFault>,
    name: &str,
    raw: Option<Value>,
) -> T {
    match raw {
        None | Some(Value::Null) => T::default(),
        Some(value) => match serde_json::from_value(value) {
            Ok(decoded) => decoded,
            Err(e) => {
                faults.push(SectionFault {
                    section: name.to_string(),
                    message: e.to_string(),
                });
                T::default()
            }
        },
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

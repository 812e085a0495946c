//! # Content Paths
//!
//! Dotted path strings (`"homePage.heroSlides.2.title.en"`) are the mutation
//! address of the editor. This module gives them a typed form and checks them
//! against the known document shape, so a typo in a hard-coded path is caught
//! instead of silently vivifying a field nobody renders.
//!
//! ```text
//! "projects.0.activities.3.title.en"
//!     Key("projects") Index(0) Key("activities") Index(3) Key("title") Key("en")
//! ```

use crate::{
    AlliancePartner, ContentDocument, HeroSlide, Language, NavLink, Project, ProjectActivity,
    SocialLink, Statistic, TeamMember, BlogPost, ValueItem,
};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// One step of a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Empty segment in path '{path}'")]
    EmptySegment { path: String },

    #[error("Unknown field '{key}' at '{path}'")]
    UnknownKey { path: String, key: String },

    #[error("Index {index} used on record at '{path}'")]
    IndexOnRecord { path: String, index: usize },

    #[error("Field '{key}' used on list at '{path}'")]
    KeyOnList { path: String, key: String },

    #[error("Path continues past a leaf value at '{path}'")]
    BeyondLeaf { path: String },
}

/// Split a raw path into its segments; the empty path addresses the root
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(move |_| !path.is_empty())
}

/// True when a raw segment is a canonical non-negative integer literal
pub fn is_index_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'))
}

/// Parse an index segment
pub fn parse_index(segment: &str) -> Option<usize> {
    if is_index_segment(segment) {
        segment.parse().ok()
    } else {
        None
    }
}

/// Typed dotted path into the content document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ContentPath {
    segments: Vec<Segment>,
}

impl ContentPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(key.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    /// Select one side of a localized text
    pub fn lang(self, lang: Language) -> Self {
        self.key(lang.key())
    }

    /// Append every segment of a relative path
    pub fn join(mut self, other: &ContentPath) -> Self {
        self.segments.extend(other.segments.iter().cloned());
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn parent(&self) -> Option<ContentPath> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// True if `self` lies strictly below `ancestor`
    pub fn starts_with(&self, ancestor: &ContentPath) -> bool {
        self.segments.len() > ancestor.segments.len()
            && self.segments[..ancestor.segments.len()] == ancestor.segments[..]
    }
}

impl fmt::Display for ContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for ContentPath {
    type Err = PathError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        for raw in split_path(path) {
            if raw.is_empty() {
                return Err(PathError::EmptySegment {
                    path: path.to_string(),
                });
            }
            segments.push(match parse_index(raw) {
                Some(index) => Segment::Index(index),
                None => Segment::Key(raw.to_string()),
            });
        }
        Ok(Self { segments })
    }
}

/// Kind of node a path resolves to in the document shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Record,
    List,
    LocalizedText,
    String,
    Number,
    Bool,
}

/// Known document shape, used to validate paths.
///
/// Backed by a skeleton document holding one sample element in every list,
/// so list item shapes are known even though the blank document has none.
#[derive(Debug, Clone)]
pub struct ContentSchema {
    skeleton: Value,
}

impl ContentSchema {
    pub fn new() -> Self {
        let skeleton = serde_json::to_value(skeleton_document()).unwrap_or(Value::Null);
        Self { skeleton }
    }

    /// Process-wide instance
    pub fn shared() -> &'static ContentSchema {
        static SCHEMA: OnceLock<ContentSchema> = OnceLock::new();
        SCHEMA.get_or_init(ContentSchema::new)
    }

    /// Check a typed path and report what it points at
    pub fn validate(&self, path: &ContentPath) -> Result<NodeKind, PathError> {
        let mut node = &self.skeleton;
        let mut walked = ContentPath::root();

        for segment in path.segments() {
            node = match (node, segment) {
                (Value::Object(map), Segment::Key(key)) => {
                    map.get(key).ok_or_else(|| PathError::UnknownKey {
                        path: walked.to_string(),
                        key: key.clone(),
                    })?
                }
                (Value::Object(_), Segment::Index(index)) => {
                    return Err(PathError::IndexOnRecord {
                        path: walked.to_string(),
                        index: *index,
                    })
                }
                // Every list in the skeleton carries exactly one sample element
                (Value::Array(items), Segment::Index(_)) => match items.first() {
                    Some(sample) => sample,
                    None => {
                        return Err(PathError::BeyondLeaf {
                            path: walked.to_string(),
                        })
                    }
                },
                (Value::Array(_), Segment::Key(key)) => {
                    return Err(PathError::KeyOnList {
                        path: walked.to_string(),
                        key: key.clone(),
                    })
                }
                _ => {
                    return Err(PathError::BeyondLeaf {
                        path: walked.to_string(),
                    })
                }
            };
            walked = match segment {
                Segment::Key(key) => walked.key(key.clone()),
                Segment::Index(index) => walked.index(*index),
            };
        }

        Ok(kind_of(node))
    }

    /// Parse and validate a raw path
    pub fn validate_str(&self, path: &str) -> Result<ContentPath, PathError> {
        let parsed: ContentPath = path.parse()?;
        self.validate(&parsed)?;
        Ok(parsed)
    }
}

impl Default for ContentSchema {
    fn default() -> Self {
        Self::new()
    }
}

fn kind_of(node: &Value) -> NodeKind {
    match node {
        Value::Object(map) if map.len() == 2 && map.contains_key("en") && map.contains_key("es") => {
            NodeKind::LocalizedText
        }
        Value::Object(_) => NodeKind::Record,
        Value::Array(_) => NodeKind::List,
        Value::Number(_) => NodeKind::Number,
        Value::Bool(_) => NodeKind::Bool,
        Value::String(_) | Value::Null => NodeKind::String,
    }
}

/// Document with one default element in every list (recursively)
fn skeleton_document() -> ContentDocument {
    let mut doc = ContentDocument::blank();

    doc.global.navigation.push(NavLink {
        end: Some(false),
        ..Default::default()
    });
    doc.global.social_links.push(SocialLink::default());

    let home = &mut doc.home_page;
    home.hero_slides.push(HeroSlide {
        project_id: Some(String::new()),
        activity_id: Some(String::new()),
        ..Default::default()
    });
    home.action_lines.items.push(ValueItem::default());
    home.values.items.push(ValueItem::default());
    home.our_numbers.stats.push(Statistic {
        background_images: vec![String::new()],
        ..Default::default()
    });
    home.alliances.partners.push(AlliancePartner::default());

    doc.projects.push(Project {
        activities: vec![ProjectActivity::default()],
        ..Default::default()
    });
    doc.team.push(TeamMember::default());
    doc.blog.push(BlogPost::default());

    doc
}

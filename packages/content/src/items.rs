//! Identified list items and the named list collections of the document.

use crate::{
    AlliancePartner, BlogPost, ContentPath, HeroSlide, Language, NavLink, Project,
    ProjectActivity, SocialLink, Statistic, TeamMember, ValueItem,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Element of an ordered list collection.
///
/// `id` is unique within the containing list only.
pub trait ListItem: Serialize + DeserializeOwned + Clone + Default {
    /// Human name of the entity ("Project", "Team Member", ...)
    const ENTITY: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Label shown on the item's tab, if the item has one
    fn label(&self, _lang: Language) -> Option<&str> {
        None
    }
}

macro_rules! localized_label {
    ($ty:ty, $entity:expr, $field:ident) => {
        impl ListItem for $ty {
            const ENTITY: &'static str = $entity;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }

            fn label(&self, lang: Language) -> Option<&str> {
                Some(self.$field.get(lang))
            }
        }
    };
}

localized_label!(Project, "Project", title);
localized_label!(ProjectActivity, "Activity", title);
localized_label!(TeamMember, "Team Member", name);
localized_label!(BlogPost, "Blog Post", title);
localized_label!(HeroSlide, "Slide", title);
localized_label!(ValueItem, "Item", title);
localized_label!(NavLink, "Link", label);
localized_label!(Statistic, "Statistic", label);

impl ListItem for AlliancePartner {
    const ENTITY: &'static str = "Partner";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn label(&self, _lang: Language) -> Option<&str> {
        Some(&self.name)
    }
}

impl ListItem for SocialLink {
    const ENTITY: &'static str = "Social Link";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    // The id doubles as the network name
    fn label(&self, _lang: Language) -> Option<&str> {
        Some(&self.id)
    }
}

/// Untyped items, for lists whose shape is only known at runtime.
///
/// The label is the first of `title`, `name`, `label` that is a localized
/// text or a plain string.
impl ListItem for Value {
    const ENTITY: &'static str = "Item";

    fn id(&self) -> &str {
        self.get("id").and_then(Value::as_str).unwrap_or("")
    }

    fn set_id(&mut self, id: String) {
        if let Value::Object(map) = self {
            map.insert("id".to_string(), Value::String(id));
        }
    }

    fn label(&self, lang: Language) -> Option<&str> {
        ["title", "name", "label"].iter().find_map(|field| {
            match self.get(*field)? {
                Value::String(text) => Some(text.as_str()),
                Value::Object(map) => map.get(lang.key()).and_then(Value::as_str),
                _ => None,
            }
        })
    }
}

/// Every list collection in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Projects,
    /// Activities owned by the project at this position
    ProjectActivities { project: usize },
    Team,
    Blog,
    Navigation,
    SocialLinks,
    HeroSlides,
    ActionLines,
    Values,
    Statistics,
    /// Background images of the statistic at this position
    StatisticImages { statistic: usize },
    Partners,
}

impl Collection {
    /// Collections with a fixed location (no parent index)
    pub const FIXED: [Collection; 10] = [
        Collection::Projects,
        Collection::Team,
        Collection::Blog,
        Collection::Navigation,
        Collection::SocialLinks,
        Collection::HeroSlides,
        Collection::ActionLines,
        Collection::Values,
        Collection::Statistics,
        Collection::Partners,
    ];

    pub fn path(&self) -> ContentPath {
        let root = ContentPath::root();
        match self {
            Collection::Projects => root.key("projects"),
            Collection::ProjectActivities { project } => {
                root.key("projects").index(*project).key("activities")
            }
            Collection::Team => root.key("team"),
            Collection::Blog => root.key("blog"),
            Collection::Navigation => root.key("global").key("navigation"),
            Collection::SocialLinks => root.key("global").key("socialLinks"),
            Collection::HeroSlides => root.key("homePage").key("heroSlides"),
            Collection::ActionLines => root.key("homePage").key("actionLines").key("items"),
            Collection::Values => root.key("homePage").key("values").key("items"),
            Collection::Statistics => root.key("homePage").key("ourNumbers").key("stats"),
            Collection::StatisticImages { statistic } => root
                .key("homePage")
                .key("ourNumbers")
                .key("stats")
                .index(*statistic)
                .key("backgroundImages"),
            Collection::Partners => root.key("homePage").key("alliances").key("partners"),
        }
    }

    /// Path of the item at `index`
    pub fn item(&self, index: usize) -> ContentPath {
        self.path().index(index)
    }

    pub fn entity_name(&self) -> &'static str {
        match self {
            Collection::Projects => Project::ENTITY,
            Collection::ProjectActivities { .. } => ProjectActivity::ENTITY,
            Collection::Team => TeamMember::ENTITY,
            Collection::Blog => BlogPost::ENTITY,
            Collection::Navigation => NavLink::ENTITY,
            Collection::SocialLinks => SocialLink::ENTITY,
            Collection::HeroSlides => HeroSlide::ENTITY,
            Collection::ActionLines | Collection::Values => ValueItem::ENTITY,
            Collection::Statistics => Statistic::ENTITY,
            Collection::StatisticImages { .. } => "Image",
            Collection::Partners => AlliancePartner::ENTITY,
        }
    }

    /// Whether items carry an `id` (scalar lists do not)
    pub fn is_identified(&self) -> bool {
        !matches!(self, Collection::StatisticImages { .. })
    }
}

//! # Content Document Model
//!
//! Typed shape of the whole site's editable content: global chrome, one
//! record per page, and the three centrally managed collections (projects,
//! team, blog).
//!
//! Every record uses `#[serde(default)]` so a document saved by an older
//! revision of the site (missing blocks, missing fields) still loads; absent
//! pieces come back blank instead of failing the whole document.

use crate::LocalizedText;
use serde::{Deserialize, Serialize};

/// Card in the action-lines and values sections
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueItem {
    pub id: String,
    pub title: LocalizedText,
    pub slogan: LocalizedText,
    pub text: LocalizedText,
    pub image_url: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectActivity {
    pub id: String,
    /// ISO date string
    pub date: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub image_url: String,
}

/// A project and the activities it owns.
///
/// Activity ids are unique within their project only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub detail_description: LocalizedText,
    pub image_url: String,
    pub image_alt: String,
    pub activities: Vec<ProjectActivity>,
    pub detail_image_url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamMember {
    pub id: String,
    pub name: LocalizedText,
    pub role: LocalizedText,
    pub bio: LocalizedText,
    pub image_url: String,
    pub image_alt: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPost {
    pub id: String,
    pub slug: String,
    pub title: LocalizedText,
    pub author: String,
    /// ISO date string
    pub date: String,
    pub summary: LocalizedText,
    pub content: LocalizedText,
    pub image_url: String,
    pub image_alt: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlliancePartner {
    pub id: String,
    pub name: String,
    pub logo_url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavLink {
    pub id: String,
    pub to: String,
    pub label: LocalizedText,
    /// Exact-match routing flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<bool>,
}

/// Social network link; `id` names the network (`facebook`, `instagram`, ...)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLink {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterContact {
    pub address: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Footer {
    pub slogan: LocalizedText,
    pub copyright: LocalizedText,
    pub contact: FooterContact,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalContent {
    pub logo_url: String,
    pub navigation: Vec<NavLink>,
    pub social_links: Vec<SocialLink>,
    pub footer: Footer,
}

/// Shared UI strings (buttons, call-to-action labels)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiText {
    pub donate_now: LocalizedText,
    pub support_mission: LocalizedText,
    pub view_all_projects: LocalizedText,
    pub learn_more: LocalizedText,
    pub read_more: LocalizedText,
    pub contact: LocalizedText,
    pub view_actions: LocalizedText,
}

/// Home page carousel slide; may link to a project activity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroSlide {
    pub id: String,
    pub title: LocalizedText,
    pub subtitle: LocalizedText,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistic {
    pub id: String,
    pub icon: String,
    pub value: String,
    pub label: LocalizedText,
    pub background_images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OurNumbersSection {
    pub title: LocalizedText,
    pub stats: Vec<Statistic>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WelcomeBlock {
    pub title_part1: LocalizedText,
    pub title_part2: LocalizedText,
    pub slogan: LocalizedText,
    pub text: LocalizedText,
    pub image_url: String,
    pub image_alt: String,
}

/// Titled list of value cards (action lines, values)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemsSection {
    pub title: LocalizedText,
    pub items: Vec<ValueItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LatestProjectsBlock {
    pub title: LocalizedText,
    pub slogan: LocalizedText,
    pub subtitle: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParallaxBlock {
    pub title: LocalizedText,
    pub text: LocalizedText,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlliancesSection {
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub partners: Vec<AlliancePartner>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomePageContent {
    pub hero_slides: Vec<HeroSlide>,
    pub welcome: WelcomeBlock,
    pub action_lines: ItemsSection,
    pub latest_projects: LatestProjectsBlock,
    pub parallax1: ParallaxBlock,
    pub values: ItemsSection,
    pub our_numbers: OurNumbersSection,
    pub alliances: AlliancesSection,
    pub parallax2: ParallaxBlock,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentBlock {
    pub title: LocalizedText,
    pub text: LocalizedText,
    pub image_url: String,
    pub image_alt: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Banner {
    pub title: LocalizedText,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryBlock {
    pub title: LocalizedText,
    pub text: LocalizedText,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutPageContent {
    pub banner: Banner,
    pub history: HistoryBlock,
    pub mission: ContentBlock,
    pub vision: ContentBlock,
    pub work: ContentBlock,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectsPageContent {
    pub banner: Banner,
    pub slogan: LocalizedText,
    pub intro: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDetailPageContent {
    pub back_to_projects: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamPageContent {
    pub banner: Banner,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPageContent {
    pub banner: Banner,
    pub featured_post_title: LocalizedText,
    pub recent_posts_title: LocalizedText,
    pub share_post_title: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactForm {
    pub title: LocalizedText,
    pub name_label: LocalizedText,
    pub email_label: LocalizedText,
    pub message_label: LocalizedText,
    pub button_text: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactPageContent {
    pub banner: Banner,
    pub intro: LocalizedText,
    pub address_title: LocalizedText,
    pub phone_title: LocalizedText,
    pub email_title: LocalizedText,
    pub form: ContactForm,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DonateForm {
    pub choose_amount: LocalizedText,
    pub custom_amount: LocalizedText,
    pub first_name: LocalizedText,
    pub last_name: LocalizedText,
    pub email_address: LocalizedText,
    pub payment_placeholder: LocalizedText,
    pub donate_amount: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThankYou {
    pub title: LocalizedText,
    pub text: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DonatePageContent {
    pub banner: Banner,
    pub intro: LocalizedText,
    pub form: DonateForm,
    pub thank_you: ThankYou,
}

/// Root of the content tree: everything the admin editor can change
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentDocument {
    pub global: GlobalContent,
    pub ui: UiText,
    pub home_page: HomePageContent,
    pub about_page: AboutPageContent,
    pub projects_page: ProjectsPageContent,
    pub project_detail_page: ProjectDetailPageContent,
    pub team_page: TeamPageContent,
    pub blog_page: BlogPageContent,
    pub contact_page: ContactPageContent,
    pub donate_page: DonatePageContent,

    // Managed centrally, referenced from pages
    pub projects: Vec<Project>,
    pub team: Vec<TeamMember>,
    pub blog: Vec<BlogPost>,
}

/// Fixed-shape sections stored as one JSON blob each
pub const PAGE_SECTIONS: [&str; 10] = [
    "global",
    "ui",
    "homePage",
    "aboutPage",
    "projectsPage",
    "projectDetailPage",
    "teamPage",
    "blogPage",
    "contactPage",
    "donatePage",
];

/// Top-level list collections stored as rows
pub const COLLECTION_SECTIONS: [&str; 3] = ["projects", "team", "blog"];

impl ContentDocument {
    /// Empty document: every section present, every list empty
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn team_member(&self, id: &str) -> Option<&TeamMember> {
        self.team.iter().find(|m| m.id == id)
    }

    pub fn blog_post(&self, id: &str) -> Option<&BlogPost> {
        self.blog.iter().find(|p| p.id == id)
    }

    pub fn blog_post_by_slug(&self, slug: &str) -> Option<&BlogPost> {
        self.blog.iter().find(|p| p.slug == slug)
    }

    /// Hero slides whose project/activity link no longer resolves
    pub fn dangling_slide_links(&self) -> Vec<&HeroSlide> {
        self.home_page
            .hero_slides
            .iter()
            .filter(|slide| match (&slide.project_id, &slide.activity_id) {
                (Some(project_id), activity_id) if !project_id.is_empty() => {
                    match self.project(project_id) {
                        None => true,
                        Some(project) => match activity_id {
                            Some(activity_id) if !activity_id.is_empty() => {
                                !project.activities.iter().any(|a| &a.id == activity_id)
                            }
                            _ => false,
                        },
                    }
                }
                _ => false,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_document_has_every_section() {
        let value = ContentDocument::blank().to_value().unwrap();
        let object = value.as_object().unwrap();

        for section in PAGE_SECTIONS.iter().chain(COLLECTION_SECTIONS.iter()) {
            assert!(object.contains_key(*section), "missing section {}", section);
        }
        assert_eq!(value["homePage"]["welcome"]["slogan"], json!({"en": "", "es": ""}));
        assert_eq!(value["projects"], json!([]));
    }

    #[test]
    fn test_older_document_shape_still_loads() {
        // No ourNumbers block, project without activities
        let value = json!({
            "homePage": { "welcome": { "slogan": { "en": "Grow" } } },
            "projects": [{ "id": "p1", "title": { "en": "Seeds", "es": "Semillas" } }]
        });

        let doc = ContentDocument::from_value(value).unwrap();
        assert_eq!(doc.home_page.welcome.slogan.en, "Grow");
        assert_eq!(doc.home_page.welcome.slogan.es, "");
        assert!(doc.home_page.our_numbers.stats.is_empty());
        assert_eq!(doc.projects[0].activities.len(), 0);
    }

    #[test]
    fn test_camel_case_field_names() {
        let mut doc = ContentDocument::blank();
        doc.home_page.welcome.title_part1.en = "Welcome to".to_string();
        doc.home_page.hero_slides.push(HeroSlide {
            id: "s1".to_string(),
            project_id: Some("p1".to_string()),
            ..Default::default()
        });

        let value = doc.to_value().unwrap();
        assert_eq!(value["homePage"]["welcome"]["titlePart1"]["en"], "Welcome to");
        assert_eq!(value["homePage"]["heroSlides"][0]["projectId"], "p1");
        assert!(value["homePage"]["heroSlides"][0].get("activityId").is_none());
    }

    #[test]
    fn test_dangling_slide_links() {
        let mut doc = ContentDocument::blank();
        doc.projects.push(Project {
            id: "p1".to_string(),
            activities: vec![ProjectActivity {
                id: "a1".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        });
        doc.home_page.hero_slides = vec![
            HeroSlide {
                id: "ok".to_string(),
                project_id: Some("p1".to_string()),
                activity_id: Some("a1".to_string()),
                ..Default::default()
            },
            HeroSlide {
                id: "missing-activity".to_string(),
                project_id: Some("p1".to_string()),
                activity_id: Some("a9".to_string()),
                ..Default::default()
            },
            HeroSlide {
                id: "missing-project".to_string(),
                project_id: Some("p2".to_string()),
                ..Default::default()
            },
            HeroSlide {
                id: "unlinked".to_string(),
                ..Default::default()
            },
        ];

        let dangling: Vec<&str> = doc
            .dangling_slide_links()
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(dangling, vec!["missing-activity", "missing-project"]);
    }
}

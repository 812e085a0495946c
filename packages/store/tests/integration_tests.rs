//! Integration tests for the store crate: editing sessions publishing into
//! real store backends

use serde_json::json;
use tempfile::TempDir;
use verdant_content::{ContentDocument, ContentStore, HeroSlide, Project, ProjectActivity, StoreError};
use verdant_editor::{DraftSession, DraftStatus, EditorError};
use verdant_store::{JsonFileContentStore, MemoryContentStore};

fn project(id: &str, activities: &[&str]) -> Project {
    Project {
        id: id.to_string(),
        activities: activities
            .iter()
            .map(|a| ProjectActivity {
                id: a.to_string(),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn seeded() -> ContentDocument {
    let mut doc = ContentDocument::blank();
    doc.projects = vec![project("p1", &["a1", "a2"]), project("p2", &["b1"])];
    doc
}

#[tokio::test]
async fn test_remove_project_publish_and_refetch() -> anyhow::Result<()> {
    let store = MemoryContentStore::with_document(&seeded())?;
    let mut session = DraftSession::open("admin", &store).await?;

    session.remove_list_item("projects", 0)?;
    session.publish(&store).await?;

    let plan = store.last_plan().await.unwrap();
    assert_eq!(plan.projects.deleted, vec!["p1"]);
    assert_eq!(plan.activities["p1"].deleted, vec!["a1", "a2"]);

    let tables = store.tables().await;
    assert!(!tables.activities.contains_key("p1"));

    let fetched = store.fetch_document().await?;
    let ids: Vec<&str> = fetched.projects.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p2"]);
    assert_eq!(fetched.projects[0].activities[0].id, "b1");
    Ok(())
}

#[tokio::test]
async fn test_republish_is_idempotent() -> anyhow::Result<()> {
    let store = MemoryContentStore::with_document(&seeded())?;
    let mut session = DraftSession::open("admin", &store).await?;

    session.edit("projects.1.title.en", "Wetlands")?;
    session.publish(&store).await?;
    let tables = store.tables().await;

    // Same document again, e.g. a retry after a lost acknowledgement
    session.publish(&store).await?;

    assert!(store.last_plan().await.unwrap().is_update_only());
    assert_eq!(store.tables().await, tables);
    Ok(())
}

#[tokio::test]
async fn test_slide_links_survive_reorder() -> anyhow::Result<()> {
    let mut doc = seeded();
    doc.home_page.hero_slides.push(HeroSlide {
        id: "s1".into(),
        project_id: Some("p2".into()),
        activity_id: Some("b1".into()),
        ..Default::default()
    });
    let store = MemoryContentStore::with_document(&doc)?;
    let mut session = DraftSession::open("admin", &store).await?;

    session.move_list_item("projects", 1, 0)?;
    session.add_list_item("projects.0.activities", json!({"date": "2024-05-01"}))?;
    session.publish(&store).await?;

    let fetched = store.fetch_document().await?;
    assert_eq!(fetched.projects[0].id, "p2");
    assert_eq!(fetched.projects[0].activities.len(), 2);
    assert!(fetched.dangling_slide_links().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_rejected_publish_keeps_draft() -> anyhow::Result<()> {
    let store = MemoryContentStore::with_document(&seeded())?;
    let mut session = DraftSession::open("admin", &store).await?;

    // Duplicate a project by hand: same id twice
    let copy = session.get("projects.0").cloned().unwrap();
    session.edit("projects.2", copy)?;

    let result = session.publish(&store).await;

    assert!(matches!(result, Err(EditorError::Store(StoreError::Rejected(_)))));
    assert_eq!(session.status(), DraftStatus::Dirty);
    assert_eq!(session.list_len("projects"), 3);
    assert_eq!(store.fetch_document().await?.projects.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_published_copy_matches_stored_document() -> anyhow::Result<()> {
    let store = MemoryContentStore::with_document(&seeded())?;
    let mut session = DraftSession::open("admin", &store).await?;

    session.edit("homePage.welcome.slogan", json!({"en": "Grow"}))?;
    let report = session.publish(&store).await?;

    assert_eq!(report.status, DraftStatus::Clean);
    assert_eq!(session.published(), &store.fetch_document().await?.to_value()?);
    assert_eq!(session.get("homePage.welcome.slogan.es"), Some(&json!("")));

    // A field the content document has no place for is never reported as saved
    session.edit("aboutPage.banner.subtitle.en", "Only in working")?;
    let result = session.publish(&store).await;

    assert!(matches!(result, Err(EditorError::PublishRejected(_))));
    assert_eq!(session.status(), DraftStatus::Dirty);
    assert_eq!(
        session.get("aboutPage.banner.subtitle.en"),
        Some(&json!("Only in working"))
    );
    assert_eq!(session.get_published("aboutPage.banner.subtitle"), None);
    assert_eq!(session.published(), &store.fetch_document().await?.to_value()?);
    Ok(())
}

#[tokio::test]
async fn test_file_store_round_trip() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("content.json");
    let store = JsonFileContentStore::create(&path, &seeded()).await?;

    let mut session = DraftSession::open("admin", &store).await?;
    session.edit("homePage.welcome.slogan.es", "Crece con nosotros")?;
    session.remove_list_item("projects.0.activities", 1)?;
    session.publish(&store).await?;

    // A fresh handle on the same file sees the published document
    let reopened = JsonFileContentStore::new(&path);
    let fetched = reopened.fetch_document().await?;
    assert_eq!(fetched.home_page.welcome.slogan.es, "Crece con nosotros");
    assert_eq!(fetched.projects[0].activities.len(), 1);
    assert_eq!(session.working_document()?, fetched);
    Ok(())
}

#[tokio::test]
async fn test_file_store_tolerates_corrupted_section() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("content.json");
    let store = JsonFileContentStore::create(&path, &seeded()).await?;

    let mut tables = store.read_tables().await?;
    tables.sections.insert("teamPage".into(), "{\"title\": ".into());
    std::fs::write(&path, serde_json::to_string(&tables)?)?;

    let report = store.load().await?;
    assert_eq!(report.faults.len(), 1);
    assert_eq!(report.faults[0].section, "teamPage");
    assert_eq!(report.document.projects.len(), 2);

    // The editor still opens and can republish a repaired section
    let mut session = DraftSession::open("admin", &store).await?;
    session.edit("teamPage.banner.title.en", "Our Team")?;
    session.publish(&store).await?;
    assert!(store.load().await?.is_clean());
    Ok(())
}

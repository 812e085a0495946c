//! Tests for chains of structural edits
//!
//! This tests:
//! - Move + remove + add chains keep selections on the right item
//! - Nested lists under reshaped lists
//! - Serialized mutation replay

use serde_json::{json, Value};
use verdant_content::{Collection, ContentDocument, Project, ProjectActivity, TeamMember};
use verdant_editor::{accessor, DraftSession, IdGenerator, ListEditor, Mutation, MutationEffect};

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

fn session() -> DraftSession {
    let mut doc = ContentDocument::blank();
    doc.projects = vec![project("p1", &["a1", "a2"]), project("p2", &["b1"]), project("p3", &[])];
    DraftSession::new("admin", doc)
        .unwrap()
        .with_id_generator(IdGenerator::from_seed("new_seq"))
}

fn ids(session: &DraftSession, path: &str) -> Vec<String> {
    accessor::list(session.working(), path)
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap_or("").to_string())
        .collect()
}

#[test]
fn test_move_list_example() {
    let mut list = vec![json!("A"), json!("B"), json!("C")];
    assert!(accessor::move_item(&mut list, 0, 2));
    assert_eq!(list, vec![json!("B"), json!("C"), json!("A")]);
}

#[test]
fn test_move_then_remove_keeps_selection_on_item() {
    let mut session = session();
    let mut projects = ListEditor::<Project>::for_collection(&mut session, Collection::Projects);
    projects.select(&mut session, Some(1));

    // p2 is selected; moving p1 behind it shifts p2 to the front
    projects.begin_drag(0);
    projects.drag_enter(2);
    projects.end_drag(&mut session).unwrap();
    assert_eq!(ids(&session, "projects"), vec!["p2", "p3", "p1"]);

    // The drag selects the moved item
    assert_eq!(projects.selected(&session).unwrap().id, "p1");

    session.move_list_item("projects", 2, 0).unwrap();
    assert_eq!(projects.selected(&session).unwrap().id, "p1");

    session.remove_list_item("projects", 1).unwrap();
    assert_eq!(ids(&session, "projects"), vec!["p1", "p3"]);
    assert_eq!(projects.selected(&session).unwrap().id, "p1");
}

#[test]
fn test_remove_only_item_clears_selection() {
    let mut doc = ContentDocument::blank();
    doc.team.push(TeamMember {
        id: "t1".to_string(),
        ..Default::default()
    });
    let mut session = DraftSession::new("admin", doc).unwrap();
    let team = ListEditor::<TeamMember>::for_collection(&mut session, Collection::Team);
    team.select(&mut session, Some(0));

    team.remove(&mut session, 0).unwrap();

    assert_eq!(team.selected_index(&session), None);
    assert!(team.is_empty(&session));
}

#[test]
fn test_nested_activity_edits_follow_project() {
    let mut session = session();
    let activities = ListEditor::<ProjectActivity>::for_collection(
        &mut session,
        Collection::ProjectActivities { project: 0 },
    );
    activities.select(&mut session, Some(1));

    let insert = activities.add_default(&mut session).unwrap();
    assert_eq!(insert.index, 2);
    assert_eq!(ids(&session, "projects.0.activities"), vec!["a1", "a2", "new_seq_1"]);

    // Reshaping the parent list drops the nested selection
    session.move_list_item("projects", 0, 2).unwrap();
    assert_eq!(activities.selected_index(&session), None);
    assert_eq!(ids(&session, "projects.2.activities"), vec!["a1", "a2", "new_seq_1"]);
}

#[test]
fn test_new_id_skips_ids_in_list() {
    let mut doc = ContentDocument::blank();
    doc.projects = vec![project("new_seq_1", &[]), project("new_seq_2", &[])];
    let mut session = DraftSession::new("admin", doc)
        .unwrap()
        .with_id_generator(IdGenerator::from_seed("new_seq"));

    let insert = session.add_list_item("projects", json!({})).unwrap();
    assert_eq!(insert.id.as_deref(), Some("new_seq_3"));
}

#[test]
fn test_replay_serialized_mutations() {
    let log = json!([
        {"type": "setField", "path": "projects.1.title.en", "value": "Reforestation"},
        {"type": "addItem", "path": "projects.1.activities", "item": {"id": "b2"}},
        {"type": "moveItem", "path": "projects.1.activities", "from": 1, "to": 0},
        {"type": "removeItem", "path": "projects", "index": 0},
        {"type": "removeItem", "path": "projects", "index": 9}
    ]);
    let mutations: Vec<Mutation> = serde_json::from_value(log).unwrap();

    let mut session = session();
    let effects: Vec<MutationEffect> = mutations
        .into_iter()
        .map(|m| session.apply(m).unwrap())
        .collect();

    assert!(effects[4].is_noop());
    assert_eq!(ids(&session, "projects"), vec!["p2", "p3"]);
    assert_eq!(ids(&session, "projects.0.activities"), vec!["b2", "b1"]);
    assert_eq!(session.get("projects.0.title.en"), Some(&json!("Reforestation")));
    assert_eq!(session.version(), 4);
}

#[test]
fn test_scalar_list_round_trip() {
    let mut session = session();
    let images = Collection::StatisticImages { statistic: 0 }.path().to_string();

    session.add_list_item(&images, json!("/media/a.jpg")).unwrap();
    session.add_list_item(&images, json!("/media/b.jpg")).unwrap();
    session.move_list_item(&images, 1, 0).unwrap();

    assert_eq!(
        accessor::get(session.working(), &images),
        Some(&Value::from(vec!["/media/b.jpg", "/media/a.jpg"]))
    );
    let document = session.working_document().unwrap();
    assert_eq!(
        document.home_page.our_numbers.stats[0].background_images,
        vec!["/media/b.jpg", "/media/a.jpg"]
    );
}

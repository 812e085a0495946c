//! # Reconciliation
//!
//! Turns a full replacement document into targeted row changes.
//!
//! ## Semantics
//!
//! For each collection (projects, activities per project, team, blog):
//!
//! - ids stored but not incoming: delete. Deleting a project deletes its
//!   activities with it
//! - ids stored and incoming: update in place, including `displayOrder`
//! - ids only incoming: insert under the caller's id
//!
//! The caller owns identity: ids are never rewritten, because other parts of
//! the document (hero slides) point at them. An incoming list with an empty
//! or repeated id is rejected before anything changes. Applying the same
//! document twice produces an update-only plan and identical tables.

use crate::tables::{ContentTables, Row, Table};
use std::collections::{BTreeMap, HashSet};
use verdant_content::{ContentDocument, ListItem, Project, StoreError};

/// Row changes for one collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionDiff {
    pub inserted: Vec<String>,
    pub updated: Vec<String>,
    pub deleted: Vec<String>,
}

impl CollectionDiff {
    fn between<T>(stored: &Table<T>, incoming: &[String]) -> Self {
        let incoming_set: HashSet<&str> = incoming.iter().map(String::as_str).collect();

        let (updated, inserted): (Vec<String>, Vec<String>) = incoming
            .iter()
            .cloned()
            .partition(|id| stored.contains_key(id));
        let deleted = stored
            .keys()
            .filter(|id| !incoming_set.contains(id.as_str()))
            .cloned()
            .collect();

        Self {
            inserted,
            updated,
            deleted,
        }
    }

    pub fn is_update_only(&self) -> bool {
        self.inserted.is_empty() && self.deleted.is_empty()
    }

    pub fn change_count(&self) -> usize {
        self.inserted.len() + self.updated.len() + self.deleted.len()
    }
}

/// Every row change needed to store one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub projects: CollectionDiff,
    /// Activity changes keyed by owning project id, including the cascade
    /// of deleted projects
    pub activities: BTreeMap<String, CollectionDiff>,
    pub team: CollectionDiff,
    pub blog: CollectionDiff,
}

impl ReconcilePlan {
    pub fn is_update_only(&self) -> bool {
        self.projects.is_update_only()
            && self.team.is_update_only()
            && self.blog.is_update_only()
            && self.activities.values().all(CollectionDiff::is_update_only)
    }

    /// (inserted, updated, deleted) over all collections
    pub fn totals(&self) -> (usize, usize, usize) {
        let diffs = [&self.projects, &self.team, &self.blog]
            .into_iter()
            .chain(self.activities.values());

        diffs.fold((0, 0, 0), |(i, u, d), diff| {
            (
                i + diff.inserted.len(),
                u + diff.updated.len(),
                d + diff.deleted.len(),
            )
        })
    }
}

pub struct Reconciler;

impl Reconciler {
    /// Compute the changes without touching `tables`
    pub fn plan(tables: &ContentTables, incoming: &ContentDocument) -> Result<ReconcilePlan, StoreError> {
        let project_ids = ids_of("projects", &incoming.projects)?;
        let team_ids = ids_of("team", &incoming.team)?;
        let blog_ids = ids_of("blog", &incoming.blog)?;

        let empty = Table::new();
        let mut activities = BTreeMap::new();

        for project in &incoming.projects {
            let incoming_ids = ids_of(
                &format!("projects.{}.activities", project.id),
                &project.activities,
            )?;
            let stored = tables.activities.get(&project.id).unwrap_or(&empty);
            let diff = CollectionDiff::between(stored, &incoming_ids);
            if diff.change_count() > 0 {
                activities.insert(project.id.clone(), diff);
            }
        }

        // Cascade: activities of projects that are going away
        let incoming_set: HashSet<&str> = project_ids.iter().map(String::as_str).collect();
        for (project_id, stored) in &tables.activities {
            if !incoming_set.contains(project_id.as_str()) && !stored.is_empty() {
                activities.insert(
                    project_id.clone(),
                    CollectionDiff {
                        deleted: stored.keys().cloned().collect(),
                        ..Default::default()
                    },
                );
            }
        }

        Ok(ReconcilePlan {
            projects: CollectionDiff::between(&tables.projects, &project_ids),
            activities,
            team: CollectionDiff::between(&tables.team, &team_ids),
            blog: CollectionDiff::between(&tables.blog, &blog_ids),
        })
    }

    /// Bring `tables` in line with `incoming`.
    ///
    /// On error `tables` is unchanged.
    pub fn apply(tables: &mut ContentTables, incoming: &ContentDocument) -> Result<ReconcilePlan, StoreError> {
        let plan = Self::plan(tables, incoming)?;
        tables.write_sections(incoming)?;

        for id in &plan.projects.deleted {
            tables.projects.remove(id);
            tables.activities.remove(id);
        }
        for (order, project) in incoming.projects.iter().enumerate() {
            let activities = tables.activities.entry(project.id.clone()).or_default();
            upsert(activities, &project.activities);
            if activities.is_empty() {
                tables.activities.remove(&project.id);
            }

            let row = Project {
                activities: Vec::new(),
                ..project.clone()
            };
            tables.projects.insert(project.id.clone(), Row::new(row, order));
        }

        upsert(&mut tables.team, &incoming.team);
        upsert(&mut tables.blog, &incoming.blog);

        let (inserted, updated, deleted) = plan.totals();
        tracing::info!(
            "[Reconcile] {} inserted, {} updated, {} deleted",
            inserted,
            updated,
            deleted
        );

        let dangling = incoming.dangling_slide_links();
        if !dangling.is_empty() {
            tracing::warn!(
                "[Reconcile] {} hero slide(s) link to missing projects or activities",
                dangling.len()
            );
        }

        Ok(plan)
    }
}

/// Delete rows that are not incoming, then insert or overwrite the rest
fn upsert<T: ListItem>(table: &mut Table<T>, incoming: &[T]) {
    let keep: HashSet<&str> = incoming.iter().map(|item| item.id()).collect();
    table.retain(|id, _| keep.contains(id.as_str()));

    for (order, item) in incoming.iter().enumerate() {
        table.insert(item.id().to_string(), Row::new(item.clone(), order));
    }
}

fn ids_of<T: ListItem>(collection: &str, items: &[T]) -> Result<Vec<String>, StoreError> {
    let mut seen = HashSet::new();
    let mut ids = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let id = item.id();
        if id.trim().is_empty() {
            return Err(StoreError::Rejected(format!(
                "{}: item {} has no id",
                collection, index
            )));
        }
        if !seen.insert(id) {
            return Err(StoreError::Rejected(format!(
                "{}: duplicate id '{}'",
                collection, id
            )));
        }
        ids.push(id.to_string());
    }

    Ok(ids)
}

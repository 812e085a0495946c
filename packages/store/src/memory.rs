use crate::reconcile::{ReconcilePlan, Reconciler};
use crate::tables::ContentTables;
use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use verdant_content::{ContentDocument, ContentStore, StoreError};

/// Content store holding its tables in memory
#[derive(Default)]
pub struct MemoryContentStore {
    tables: RwLock<ContentTables>,
    last_plan: Mutex<Option<ReconcilePlan>>,
    /// Error returned by the next `replace_document` instead of storing
    fail_next: Mutex<Option<StoreError>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `document`
    pub fn with_document(document: &ContentDocument) -> Result<Self, StoreError> {
        let mut tables = ContentTables::new();
        Reconciler::apply(&mut tables, document)?;

        Ok(Self {
            tables: RwLock::new(tables),
            ..Default::default()
        })
    }

    /// Make the next replace fail with `error`
    pub async fn fail_next_replace(&self, error: StoreError) {
        *self.fail_next.lock().await = Some(error);
    }

    pub async fn tables(&self) -> ContentTables {
        self.tables.read().await.clone()
    }

    /// Plan of the last successful replace
    pub async fn last_plan(&self) -> Option<ReconcilePlan> {
        self.last_plan.lock().await.clone()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn fetch_document(&self) -> Result<ContentDocument, StoreError> {
        Ok(self.tables.read().await.assemble().document)
    }

    async fn replace_document(&self, document: &ContentDocument) -> Result<(), StoreError> {
        if let Some(error) = self.fail_next.lock().await.take() {
            tracing::warn!("[MemoryStore] injected failure: {}", error);
            return Err(error);
        }

        let mut tables = self.tables.write().await;
        let mut next = tables.clone();
        let plan = Reconciler::apply(&mut next, document)?;
        *tables = next;

        *self.last_plan.lock().await = Some(plan);
        Ok(())
    }
}

use crate::reconcile::Reconciler;
use crate::tables::ContentTables;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use verdant_content::{ContentDocument, ContentStore, LoadReport, StoreError};

/// Content store persisting its tables as one JSON file.
///
/// Writes go to a sibling temp file that is renamed over the original, so a
/// crash mid-write leaves the previous tables in place.
pub struct JsonFileContentStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl JsonFileContentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Create the store file from `document`, replacing any existing one
    pub async fn create(path: impl Into<PathBuf>, document: &ContentDocument) -> Result<Self, StoreError> {
        let store = Self::new(path);
        let mut tables = ContentTables::new();
        Reconciler::apply(&mut tables, document)?;
        store.write_tables(&tables).await?;

        tracing::info!("[FileStore] created {}", store.path.display());
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    pub async fn read_tables(&self) -> Result<ContentTables, StoreError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(self.path.display().to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    /// Fetch with the list of sections that had to fall back to defaults
    pub async fn load(&self) -> Result<LoadReport, StoreError> {
        Ok(self.read_tables().await?.assemble())
    }

    async fn write_tables(&self, tables: &ContentTables) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(tables)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, json).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ContentStore for JsonFileContentStore {
    async fn fetch_document(&self) -> Result<ContentDocument, StoreError> {
        Ok(self.load().await?.document)
    }

    async fn replace_document(&self, document: &ContentDocument) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut tables = match self.read_tables().await {
            Ok(tables) => tables,
            Err(StoreError::NotFound(_)) => ContentTables::new(),
            Err(e) => return Err(e),
        };
        Reconciler::apply(&mut tables, document)?;
        self.write_tables(&tables).await?;

        tracing::info!("[FileStore] wrote {}", self.path.display());
        Ok(())
    }
}

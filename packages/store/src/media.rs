//! # Local Media Store
//!
//! Media library as a directory tree under a root folder. Files are exposed
//! under `base_url` with the same relative path.
//!
//! ## Path Rules
//!
//! - Paths are relative to the root, `/`-separated; `""` is the root itself
//! - Segments are NFC-normalized so visually identical names map to one file
//! - `..`, leading `/`, backslashes and NUL are rejected
//! - Filenames are a single segment

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use verdant_content::{MediaFile, MediaListing, MediaStore, StoreError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MediaPathError {
    #[error("Absolute paths are not allowed: {0}")]
    Absolute(String),

    #[error("Path escapes the media root: {0}")]
    Traversal(String),

    #[error("Invalid character in '{0}'")]
    InvalidCharacter(String),

    #[error("Invalid filename: '{0}'")]
    InvalidFilename(String),
}

impl From<MediaPathError> for StoreError {
    fn from(e: MediaPathError) -> Self {
        StoreError::Rejected(e.to_string())
    }
}

/// Split and normalize a media-relative directory path
pub fn normalize_dir(path: &str) -> Result<Vec<String>, MediaPathError> {
    if path.starts_with('/') {
        return Err(MediaPathError::Absolute(path.to_string()));
    }
    if path.contains('\\') || path.contains('\0') {
        return Err(MediaPathError::InvalidCharacter(path.to_string()));
    }

    let mut segments = Vec::new();
    for segment in path.split('/') {
        let segment: String = segment.nfc().collect();
        match segment.as_str() {
            "" | "." => continue,
            ".." => return Err(MediaPathError::Traversal(path.to_string())),
            // Windows drive prefix ("C:")
            s if s.len() == 2 && s.ends_with(':') && segments.is_empty() => {
                return Err(MediaPathError::Absolute(path.to_string()))
            }
            _ => segments.push(segment),
        }
    }
    Ok(segments)
}

/// Normalize a single filename
pub fn normalize_filename(filename: &str) -> Result<String, MediaPathError> {
    let name: String = filename.trim().nfc().collect();
    if name.is_empty() || name == "." || name == ".." {
        return Err(MediaPathError::InvalidFilename(filename.to_string()));
    }
    if name.contains('/') || name.contains('\\') || name.contains('\0') {
        return Err(MediaPathError::InvalidFilename(filename.to_string()));
    }
    Ok(name)
}

pub struct LocalMediaStore {
    root: PathBuf,
    base_url: String,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir_path(&self, segments: &[String]) -> PathBuf {
        segments.iter().fold(self.root.clone(), |p, s| p.join(s))
    }

    /// Public URL of `filename` inside the directory `segments`
    pub fn url_for(&self, segments: &[String], filename: &str) -> String {
        let mut url = self.base_url.clone();
        for segment in segments.iter().map(String::as_str).chain([filename]) {
            url.push('/');
            url.push_str(segment);
        }
        url
    }

    fn media_file(&self, segments: &[String], name: String, metadata: &std::fs::Metadata) -> MediaFile {
        MediaFile {
            url: self.url_for(segments, &name),
            name,
            size: metadata.len(),
            modified_at: metadata.modified().ok().map(DateTime::<Utc>::from),
        }
    }
}

fn not_found(e: std::io::Error, what: &Path) -> StoreError {
    if e.kind() == std::io::ErrorKind::NotFound {
        StoreError::NotFound(what.display().to_string())
    } else {
        e.into()
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn list_entries(&self, path: &str) -> Result<MediaListing, StoreError> {
        let segments = normalize_dir(path)?;
        let dir = self.dir_path(&segments);

        let mut entries = tokio::fs::read_dir(&dir).await.map_err(|e| not_found(e, &dir))?;
        let mut listing = MediaListing::default();

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let metadata = entry.metadata().await?;
            if metadata.is_dir() {
                listing.directories.push(name);
            } else if metadata.is_file() {
                listing.files.push(self.media_file(&segments, name, &metadata));
            }
        }

        listing.directories.sort();
        listing.files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listing)
    }

    async fn upload(&self, path: &str, filename: &str, bytes: &[u8]) -> Result<MediaFile, StoreError> {
        let segments = normalize_dir(path)?;
        let name = normalize_filename(filename)?;
        let dir = self.dir_path(&segments);

        if !tokio::fs::try_exists(&dir).await.unwrap_or(false) {
            return Err(StoreError::NotFound(dir.display().to_string()));
        }

        let target = dir.join(&name);
        tokio::fs::write(&target, bytes).await?;
        let metadata = tokio::fs::metadata(&target).await?;

        tracing::info!("[Media] uploaded {} ({} bytes)", target.display(), bytes.len());
        Ok(self.media_file(&segments, name, &metadata))
    }

    async fn delete_file(&self, path: &str, filename: &str) -> Result<(), StoreError> {
        let segments = normalize_dir(path)?;
        let name = normalize_filename(filename)?;
        let target = self.dir_path(&segments).join(name);

        let metadata = tokio::fs::metadata(&target)
            .await
            .map_err(|e| not_found(e, &target))?;
        if !metadata.is_file() {
            return Err(StoreError::Rejected(format!("not a file: {}", target.display())));
        }

        tokio::fs::remove_file(&target).await?;
        tracing::info!("[Media] deleted {}", target.display());
        Ok(())
    }

    async fn create_folder(&self, path: &str) -> Result<(), StoreError> {
        let segments = normalize_dir(path)?;
        if segments.is_empty() {
            return Err(StoreError::Rejected("folder name is required".to_string()));
        }

        let dir = self.dir_path(&segments);
        tokio::fs::create_dir_all(&dir).await?;
        tracing::info!("[Media] created folder {}", dir.display());
        Ok(())
    }

    async fn delete_folder(&self, path: &str) -> Result<(), StoreError> {
        let segments = normalize_dir(path)?;
        if segments.is_empty() {
            return Err(StoreError::Rejected("cannot delete the media root".to_string()));
        }

        let dir = self.dir_path(&segments);
        let mut entries = tokio::fs::read_dir(&dir).await.map_err(|e| not_found(e, &dir))?;
        if entries.next_entry().await?.is_some() {
            return Err(StoreError::Rejected(format!("folder is not empty: {}", path)));
        }

        tokio::fs::remove_dir(&dir).await?;
        tracing::info!("[Media] deleted folder {}", dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_dir() {
        assert_eq!(normalize_dir("").unwrap(), Vec::<String>::new());
        assert_eq!(normalize_dir("projects/./2024/").unwrap(), vec!["projects", "2024"]);
        assert!(matches!(normalize_dir("../etc"), Err(MediaPathError::Traversal(_))));
        assert!(matches!(normalize_dir("a/../../b"), Err(MediaPathError::Traversal(_))));
        assert!(matches!(normalize_dir("/etc"), Err(MediaPathError::Absolute(_))));
        assert!(matches!(normalize_dir("C:/x"), Err(MediaPathError::Absolute(_))));
        assert!(matches!(normalize_dir("a\\b"), Err(MediaPathError::InvalidCharacter(_))));
    }

    #[test]
    fn test_filenames_are_nfc() {
        // "e" + combining acute accent
        let decomposed = "cafe\u{301}.jpg";
        assert_eq!(normalize_filename(decomposed).unwrap(), "caf\u{e9}.jpg");
        assert!(normalize_filename("a/b.jpg").is_err());
        assert!(normalize_filename("..").is_err());
        assert!(normalize_filename("  ").is_err());
    }

    #[tokio::test]
    async fn test_upload_list_delete() {
        let dir = TempDir::new().unwrap();
        let store = LocalMediaStore::new(dir.path(), "https://cdn.example.org/media/");

        store.create_folder("projects").await.unwrap();
        let file = store.upload("projects", "tree.jpg", b"jpeg").await.unwrap();
        assert_eq!(file.url, "https://cdn.example.org/media/projects/tree.jpg");
        assert_eq!(file.size, 4);

        let root = store.list_entries("").await.unwrap();
        assert_eq!(root.directories, vec!["projects"]);
        assert!(root.files.is_empty());

        let listing = store.list_entries("projects").await.unwrap();
        assert_eq!(listing.files.len(), 1);
        assert!(listing.files[0].modified_at.is_some());

        assert!(matches!(
            store.delete_folder("projects").await,
            Err(StoreError::Rejected(_))
        ));
        store.delete_file("projects", "tree.jpg").await.unwrap();
        store.delete_folder("projects").await.unwrap();
        assert!(store.list_entries("").await.unwrap().directories.is_empty());
    }

    #[tokio::test]
    async fn test_missing_entries() {
        let dir = TempDir::new().unwrap();
        let store = LocalMediaStore::new(dir.path(), "/media");

        assert!(matches!(store.list_entries("nope").await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete_file("", "nope.png").await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.upload("nope", "a.png", b"x").await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.upload("../x", "a.png", b"x").await, Err(StoreError::Rejected(_))));
    }
}

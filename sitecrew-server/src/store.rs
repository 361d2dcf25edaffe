//! Metadata persistence.
//!
//! The whole document is read and rewritten on every mutation; the only
//! supported update pattern is load → mutate → save. There is no cross-process
//! locking. Within one process `SiteService` serializes writers.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::SiteError;
use crate::model::Document;

#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Create an empty document if none exists. Idempotent.
    async fn initialize(&self) -> Result<(), SiteError>;

    /// Read the current document.
    async fn load(&self) -> Result<Document, SiteError>;

    /// Replace the document wholesale.
    async fn save(&self, doc: &Document) -> Result<(), SiteError>;
}

/// JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "sites.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl MetadataStore for JsonFileStore {
    async fn initialize(&self) -> Result<(), SiteError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SiteError::storage("Failed to create metadata directory", e))?;
        }
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| SiteError::storage("Failed to stat metadata file", e))?;
        if exists {
            tracing::info!(path = %self.path.display(), "Using existing metadata file");
            return Ok(());
        }
        tracing::info!(path = %self.path.display(), "Creating metadata file");
        self.save(&Document::default()).await
    }

    async fn load(&self) -> Result<Document, SiteError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SiteError::storage(&format!("Failed to read {}", self.path.display()), e)
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            SiteError::storage(&format!("Corrupt metadata in {}", self.path.display()), e)
        })
    }

    async fn save(&self, doc: &Document) -> Result<(), SiteError> {
        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| SiteError::storage("Failed to serialize metadata", e))?;
        // Write beside the target, then rename over it.
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, json).await.map_err(|e| {
            SiteError::storage(&format!("Failed to write {}", tmp.display()), e)
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            SiteError::storage(&format!("Failed to replace {}", self.path.display()), e)
        })?;
        tracing::debug!(path = %self.path.display(), sites = doc.sites.len(), "Metadata saved");
        Ok(())
    }
}

/// In-process document (for testing).
///
/// `None` until initialized, so `load` before `initialize` fails the same
/// way a missing file does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    doc: Mutex<Option<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that is already initialized with `doc`.
    pub fn with_document(doc: Document) -> Self {
        Self {
            doc: Mutex::new(Some(doc)),
        }
    }
}

#[async_trait]
impl MetadataStore for MemoryStore {
    async fn initialize(&self) -> Result<(), SiteError> {
        self.doc.lock().get_or_insert_with(Document::default);
        Ok(())
    }

    async fn load(&self) -> Result<Document, SiteError> {
        self.doc
            .lock()
            .clone()
            .ok_or_else(|| SiteError::StorageUnavailable("Store not initialized".to_string()))
    }

    async fn save(&self, doc: &Document) -> Result<(), SiteError> {
        *self.doc.lock() = Some(doc.clone());
        Ok(())
    }
}

//! Backing document loading
//!
//! The `/data` endpoint reloads the document on every request. Loaders turn
//! a missing document into [`Error::NotFound`] and a document that does not
//! parse into [`Error::Malformed`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::models::ContentRecord;
use crate::{Error, Result};

/// Source of raw content records
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Load every record of the document, in document order
    async fn load(&self) -> Result<Vec<ContentRecord>>;
}

/// Loads a JSON array of content records from a file
#[derive(Debug, Clone)]
pub struct FileDocumentLoader {
    path: PathBuf,
}

impl FileDocumentLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentLoader for FileDocumentLoader {
    async fn load(&self) -> Result<Vec<ContentRecord>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound(self.path.display().to_string()));
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let records = parse_document(&bytes)?;
        debug!(
            "Loaded {} records from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

/// Serves a fixed set of records held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticDocumentLoader {
    records: Vec<ContentRecord>,
}

impl StaticDocumentLoader {
    pub fn new(records: Vec<ContentRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl DocumentLoader for StaticDocumentLoader {
    async fn load(&self) -> Result<Vec<ContentRecord>> {
        Ok(self.records.clone())
    }
}

/// Parse a JSON document into content records
///
/// Bytes that are not UTF-8 are reported as [`Error::Malformed`].
pub fn parse_document(bytes: &[u8]) -> Result<Vec<ContentRecord>> {
    Ok(serde_json::from_slice(bytes)?)
}

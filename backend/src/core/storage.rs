use std::path::PathBuf;
use thiserror::Error;

use crate::core::models::{Category, Library};
use crate::core::record::RecordError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt {category} store at {}: {source}", path.display())]
    Corrupt {
        category: Category,
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize the {category} collection: {source}")]
    Serialization {
        category: Category,
        source: serde_json::Error,
    },
}

/// One record skipped during a load, with what made it malformed.
#[derive(Debug)]
pub struct SkippedRecord {
    pub category: Category,
    pub index: usize,
    pub error: RecordError,
}

/// Per-item problems encountered while loading. A malformed record never
/// aborts the load of its siblings, but it is counted here rather than
/// dropped silently.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub skipped: Vec<SkippedRecord>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

pub trait CatalogStore {
    fn load(&self) -> Result<(Library, LoadReport), StorageError>;
    fn save(&self, library: &Library) -> Result<(), StorageError>;
}

//! File-backed catalog store: one JSON array per category.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::warn;

use crate::core::models::{Category, Item, Library};
use crate::core::record::decode_record;
use crate::core::storage::{CatalogStore, LoadReport, SkippedRecord, StorageError};

/// Backing file per category. Paths are configurable; `in_dir` applies the
/// conventional names inside one data directory.
#[derive(Debug, Clone)]
pub struct StorePaths {
    movies: PathBuf,
    games: PathBuf,
    books: PathBuf,
}

impl StorePaths {
    pub fn new(movies: PathBuf, games: PathBuf, books: PathBuf) -> Self {
        Self {
            movies,
            games,
            books,
        }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            movies: dir.join(Category::Movies.file_name()),
            games: dir.join(Category::Games.file_name()),
            books: dir.join(Category::Books.file_name()),
        }
    }

    pub fn path(&self, category: Category) -> &Path {
        match category {
            Category::Movies => &self.movies,
            Category::Games => &self.games,
            Category::Books => &self.books,
        }
    }
}

pub struct JsonFileStore {
    paths: StorePaths,
}

impl JsonFileStore {
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }

    /// Store rooted in one data directory, created if absent.
    pub fn in_dir(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        fs::create_dir_all(dir.as_ref())?;
        Ok(Self::new(StorePaths::in_dir(dir)))
    }

    /// Store over explicitly chosen backing files, creating any missing
    /// parent directories.
    pub fn with_paths(paths: StorePaths) -> Result<Self, StorageError> {
        for category in Category::ALL {
            if let Some(parent) = paths.path(category).parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
        }
        Ok(Self::new(paths))
    }

    fn load_collection(
        &self,
        category: Category,
        report: &mut LoadReport,
    ) -> Result<Vec<Item>, StorageError> {
        let path = self.paths.path(category);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let text = fs::read_to_string(path)?;
        let records: Vec<Value> =
            serde_json::from_str(&text).map_err(|source| StorageError::Corrupt {
                category,
                path: path.to_path_buf(),
                source,
            })?;

        let mut items = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            match decode_record(record) {
                Ok(item) => items.push(item),
                Err(error) => {
                    warn!(%category, index, %error, "skipping malformed record");
                    report.skipped.push(SkippedRecord {
                        category,
                        index,
                        error,
                    });
                }
            }
        }
        Ok(items)
    }

    fn save_collection(&self, category: Category, items: &[Item]) -> Result<(), StorageError> {
        let json =
            serde_json::to_string(items).map_err(|source| StorageError::Serialization {
                category,
                source,
            })?;

        // Write to a sibling temp file and rename over the target, so a crash
        // mid-write never leaves a truncated collection behind.
        let path = self.paths.path(category);
        // A bare file name has an empty parent; temp in the cwd then.
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(path).map_err(|e| StorageError::Io(e.error))?;
        Ok(())
    }
}

impl CatalogStore for JsonFileStore {
    fn load(&self) -> Result<(Library, LoadReport), StorageError> {
        let mut report = LoadReport::default();
        let library = Library {
            movies: self.load_collection(Category::Movies, &mut report)?,
            games: self.load_collection(Category::Games, &mut report)?,
            books: self.load_collection(Category::Books, &mut report)?,
        };
        Ok((library, report))
    }

    fn save(&self, library: &Library) -> Result<(), StorageError> {
        for category in Category::ALL {
            self.save_collection(category, library.items(category))?;
        }
        Ok(())
    }
}

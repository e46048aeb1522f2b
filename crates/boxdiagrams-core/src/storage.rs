//! File-based document storage.

use crate::document::Document;
use crate::error::FormatError;
use crate::format::envelope::sniff;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension of document files.
pub const FILE_EXTENSION: &str = "bxa";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Stores documents as `.bxa` files in one directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Linux: `~/.local/share/boxdiagrams/documents/`
    /// On Windows: `%LOCALAPPDATA%\boxdiagrams\documents\`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("boxdiagrams").join("documents"))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn document_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.{}", safe_id, FILE_EXTENSION))
    }

    /// Save a document, replacing any previous one with the same id.
    pub fn save(&self, id: &str, document: &Document) -> StorageResult<()> {
        let path = self.document_path(id);
        let file = File::create(&path)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        document.save(&mut BufWriter::new(file))?;
        log::debug!("saved {} to {}", id, path.display());
        Ok(())
    }

    /// Load a document.
    pub fn load(&self, id: &str) -> StorageResult<Document> {
        let path = self.document_path(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }
        let file = File::open(&path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Ok(Document::load(&mut BufReader::new(file))?)
    }

    /// Delete a document. Deleting a missing document is not an error.
    pub fn delete(&self, id: &str) -> StorageResult<()> {
        let path = self.document_path(id);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }

    /// List the ids of all stored documents.
    ///
    /// Files with the right extension but the wrong signature are left out.
    pub fn list(&self) -> StorageResult<Vec<String>> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }
        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

        let mut ids = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_none_or(|e| e != FILE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if has_signature(&path) {
                ids.push(stem.to_string());
            } else {
                log::warn!("ignoring {}: not a document file", path.display());
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Check if a document exists.
    pub fn exists(&self, id: &str) -> bool {
        self.document_path(id).exists()
    }
}

fn has_signature(path: &Path) -> bool {
    let mut head = Vec::with_capacity(4);
    File::open(path)
        .and_then(|f| f.take(4).read_to_end(&mut head))
        .is_ok_and(|_| sniff(&head))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::TextBox;
    use kurbo::Rect;
    use tempfile::tempdir;

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.add_shape(TextBox::new(Rect::new(0.0, 0.0, 80.0, 40.0), "Stored"));
        doc
    }

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        storage.save("test-doc", &sample()).unwrap();
        let loaded = storage.load("test-doc").unwrap();

        assert_eq!(loaded, sample());
        assert!(dir.path().join("test-doc.bxa").exists());
    }

    #[test]
    fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        let result = storage.load("nonexistent");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_file_storage_list() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        storage.save("doc1", &Document::new()).unwrap();
        storage.save("doc2", &sample()).unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        fs::write(dir.path().join("bogus.bxa"), "{}").unwrap();

        assert_eq!(storage.list().unwrap(), vec!["doc1".to_string(), "doc2".to_string()]);
    }

    #[test]
    fn test_file_storage_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        storage.save("test", &sample()).unwrap();
        assert!(storage.exists("test"));

        storage.delete("test").unwrap();
        assert!(!storage.exists("test"));
        storage.delete("test").unwrap();
    }

    #[test]
    fn test_file_storage_sanitizes_id() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        storage.save("test/doc:with*special", &sample()).unwrap();

        let loaded = storage.load("test/doc:with*special").unwrap();
        assert_eq!(loaded, sample());
        assert!(dir.path().join("test_doc_with_special.bxa").exists());
    }

    #[test]
    fn test_foreign_file_is_format_error() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        fs::write(dir.path().join("foreign.bxa"), b"PK\x03\x04").unwrap();

        let result = storage.load("foreign");
        assert!(matches!(
            result,
            Err(StorageError::Format(FormatError::SignatureMismatch))
        ));
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = FileStorage::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(storage.base_path(), nested.as_path());
    }
}

// src/storage/mod.rs
use crate::extractors::section::Section;
use crate::utils::error::StorageError;
use std::fs;
use std::path::{Path, PathBuf};

/// Persistence for extracted sections, keyed by `(document_id, section_name)`.
///
/// Storing the same key twice replaces the earlier content.
pub trait SectionStore {
    fn store_section(&self, document_id: &str, section: &Section) -> Result<(), StorageError>;
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Directory holding every section of one document: `/base_dir/<document_id>/`
    pub fn document_dir(&self, document_id: &str) -> PathBuf {
        self.base_dir.join(path_component(document_id))
    }

    /// Saves the section content as plain text
    pub fn save_section(&self, document_id: &str, section: &Section) -> Result<PathBuf, StorageError> {
        let target_dir = self.ensure_document_dir(document_id)?;
        let file_path = target_dir.join(format!("{}.txt", path_component(&section.section_name)));

        fs::write(&file_path, section.content.as_bytes()).map_err(StorageError::IoError)?;

        tracing::debug!("Saved section to {}", file_path.display());
        Ok(file_path)
    }

    /// Saves metadata about the section in JSON format
    pub fn save_section_metadata(&self, document_id: &str, section: &Section) -> Result<PathBuf, StorageError> {
        let target_dir = self.ensure_document_dir(document_id)?;
        let file_path = target_dir.join(format!("{}_meta.json", path_component(&section.section_name)));

        let metadata = serde_json::json!({
            "document_id": document_id,
            "item": section.item,
            "section_name": section.section_name,
            "section_title": section.section_title,
            "word_count": section.word_count,
            "char_count": section.char_count,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::debug!("Saved metadata to {}", file_path.display());
        Ok(file_path)
    }

    fn ensure_document_dir(&self, document_id: &str) -> Result<PathBuf, StorageError> {
        let target_dir = self.document_dir(document_id);
        if !target_dir.exists() {
            fs::create_dir_all(&target_dir).map_err(StorageError::IoError)?;
        }
        Ok(target_dir)
    }
}

impl SectionStore for StorageManager {
    fn store_section(&self, document_id: &str, section: &Section) -> Result<(), StorageError> {
        self.save_section(document_id, section)?;
        self.save_section_metadata(document_id, section)?;
        tracing::info!("Stored {} for {}", section.section_name, document_id);
        Ok(())
    }
}

/// Keeps ids and names inside their directory: separators and dots become `_`.
fn path_component(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

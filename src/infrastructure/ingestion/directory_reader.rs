//! Loads every file of a data directory as a document

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::ParserFactory;
use crate::domain::ingestion::{Document, DocumentMetadata, ParserInput};
use crate::domain::DomainError;

/// Reads the files of a directory in sorted path order
///
/// Hidden entries (leading `.`) are skipped. Subdirectories are only
/// descended into when `recursive` is set.
#[derive(Debug, Clone)]
pub struct DirectoryReader {
    root: PathBuf,
    recursive: bool,
}

impl DirectoryReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            recursive: false,
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List the files that would be loaded
    pub async fn list_files(&self) -> Result<Vec<PathBuf>, DomainError> {
        let is_dir = tokio::fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);

        if !is_dir {
            return Err(DomainError::validation(format!(
                "Data directory not found: {}",
                self.root.display()
            )));
        }

        let mut files = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir)
                .await
                .map_err(|e| io_error(&dir, e))?;

            while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(&dir, e))? {
                if is_hidden(&entry.file_name().to_string_lossy()) {
                    continue;
                }

                // follows symlinks, unlike DirEntry::file_type
                let path = entry.path();
                let target = tokio::fs::metadata(&path).await.map_err(|e| io_error(&path, e))?;

                if target.is_dir() {
                    if self.recursive {
                        pending.push(path);
                    }
                } else {
                    files.push(path);
                }
            }
        }

        if files.is_empty() {
            return Err(DomainError::validation(format!(
                "No files found in {}",
                self.root.display()
            )));
        }

        files.sort();
        Ok(files)
    }

    /// Parse every listed file into a document
    pub async fn load(&self) -> Result<Vec<Document>, DomainError> {
        let files = self.list_files().await?;
        let mut documents = Vec::with_capacity(files.len());

        for path in files {
            documents.push(self.load_file(&path).await?);
        }

        info!(
            directory = %self.root.display(),
            documents = documents.len(),
            "Loaded documents"
        );

        Ok(documents)
    }

    async fn load_file(&self, path: &Path) -> Result<Document, DomainError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| io_error(path, e))?;
        let fs_meta = tokio::fs::metadata(path).await.map_err(|e| io_error(path, e))?;

        let id = self.document_id(path);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| id.clone());

        let parser = ParserFactory::for_path(path);
        debug!(document = %id, bytes = bytes.len(), "Parsing document");

        let input = ParserInput::from_bytes(bytes).with_filename(id.clone());
        let parsed = parser.parse(input).await?;

        let mime_type = parsed.metadata.mime_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        });

        let mut metadata = DocumentMetadata::new()
            .with_source(path.display().to_string())
            .with_mime_type(mime_type)
            .with_custom("file_name", serde_json::json!(file_name))
            .with_custom("file_size", serde_json::json!(fs_meta.len()));

        if let Ok(modified) = fs_meta.modified() {
            metadata = metadata.with_modified_at(DateTime::<Utc>::from(modified));
        }

        let metadata = metadata.merge(parsed.metadata);

        Ok(Document::new(id, parsed.content, metadata))
    }

    /// Path relative to the root with `/` separators
    fn document_id(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);

        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn io_error(path: &Path, err: std::io::Error) -> DomainError {
    DomainError::io(format!("{}: {}", path.display(), err))
}

//! Directory-tree library.

use crate::domain::document::INFO_FILE_NAME;
use crate::domain::error::{BibshelfError, Result};
use crate::domain::Document;
use crate::library::DocumentStore;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Library rooted at a directory, scanned recursively.
#[derive(Debug, Clone)]
pub struct FolderLibrary {
    root: PathBuf,
}

impl FolderLibrary {
    /// Creates a library rooted at `root` (a sandbox path).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DocumentStore for FolderLibrary {
    fn load_all(&mut self) -> Result<Vec<Document>> {
        let _span = tracing::debug_span!("load_all", root = %self.root.display()).entered();

        if !self.root.is_dir() {
            return Err(BibshelfError::Library(format!(
                "library directory {} does not exist",
                self.root.display()
            )));
        }

        let documents: Vec<Document> = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| {
                entry
                    .map_err(|e| tracing::warn!(error = %e, "skipping unreadable library entry"))
                    .ok()
            })
            .filter(|entry| entry.file_type().is_file() && entry.file_name() == INFO_FILE_NAME)
            .filter_map(|entry| {
                let folder = entry.path().parent()?;
                Document::from_folder(folder)
                    .map_err(|e| {
                        tracing::warn!(folder = %folder.display(), error = %e, "skipping document");
                    })
                    .ok()
            })
            .collect();

        tracing::debug!(documents = documents.len(), "library scanned");
        Ok(documents)
    }

    fn load_document(&mut self, folder: &str) -> Result<Document> {
        let mut document = Document::new(folder, Default::default());
        document.load()?;
        Ok(document)
    }
}

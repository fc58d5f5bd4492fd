//! Library backend abstraction.

use crate::domain::error::Result;
use crate::domain::Document;

/// Source of documents for the worker.
///
/// # Examples
///
/// ```no_run
/// use bibshelf::library::{DocumentStore, FolderLibrary};
///
/// let mut library = FolderLibrary::new("/host/papers");
/// let documents = library.load_all()?;
/// # Ok::<(), bibshelf::BibshelfError>(())
/// ```
pub trait DocumentStore: Send {
    /// Loads every document, ordered by folder path.
    ///
    /// Documents that fail to load are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the library itself cannot be read.
    fn load_all(&mut self) -> Result<Vec<Document>>;

    /// Loads the document stored in `folder`.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder has no readable info file.
    fn load_document(&mut self, folder: &str) -> Result<Document>;
}

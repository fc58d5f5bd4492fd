//! Worker state and message processing.
//!
//! [`LibraryWorker`] is plain Rust: it turns a JSON payload into a JSON
//! response. The Zellij worker glue that receives payloads and posts
//! responses back lives in the plugin binary.

use crate::domain::error::{BibshelfError, Result};
use crate::library::{DocumentStore, FolderLibrary};
use crate::worker::{WorkerMessage, WorkerResponse};

/// Worker thread state.
///
/// The store is created when the first `LoadLibrary` request names the
/// library root.
#[derive(Default)]
pub struct LibraryWorker {
    store: Option<Box<dyn DocumentStore>>,
}

impl LibraryWorker {
    /// Creates a worker backed by an existing store.
    #[must_use]
    pub fn with_store(store: Box<dyn DocumentStore>) -> Self {
        Self { store: Some(store) }
    }

    fn get_store(&mut self) -> Result<&mut Box<dyn DocumentStore>> {
        self.store
            .as_mut()
            .ok_or_else(|| BibshelfError::Worker("library not loaded yet".to_string()))
    }

    /// Converts a store result into a response, logging the outcome.
    fn handle_store_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "library operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation = operation, error = %e, "library operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    fn handle_load_library(&mut self, library_dir: String) -> WorkerResponse {
        let store = self
            .store
            .insert(Box::new(FolderLibrary::new(library_dir)));
        Self::handle_store_result("load library", store.load_all(), |documents| {
            WorkerResponse::LibraryLoaded { documents }
        })
    }

    fn handle_reload_document(&mut self, index: usize, folder: &str) -> WorkerResponse {
        Self::handle_store_result(
            "reload document",
            self.get_store().and_then(|store| store.load_document(folder)),
            |document| WorkerResponse::DocumentReloaded { index, document },
        )
    }

    /// Processes one request.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let queued_ms = chrono::Utc::now().timestamp_millis() - message.sent_at();
        let span = tracing::debug_span!("worker_handle_message", message_type = ?message, queued_ms);
        let _guard = span.entered();

        match message {
            WorkerMessage::LoadLibrary { library_dir, .. } => self.handle_load_library(library_dir),
            WorkerMessage::ReloadDocument { index, folder, .. } => {
                self.handle_reload_document(index, &folder)
            }
        }
    }

    /// Decodes a JSON request, handles it and encodes the response.
    ///
    /// Returns `None` if the payload is not a request or the response cannot
    /// be encoded; both are logged.
    pub fn handle_payload(&mut self, payload: &str) -> Option<String> {
        let message: WorkerMessage = serde_json::from_str(payload)
            .map_err(|e| tracing::debug!(error = %e, "failed to deserialize worker message"))
            .ok()?;
        let response = self.handle_message(message);
        serde_json::to_string(&response)
            .map_err(|e| tracing::debug!(error = %e, "failed to serialize worker response"))
            .ok()
    }
}

impl std::fmt::Debug for LibraryWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryWorker")
            .field("loaded", &self.store.is_some())
            .finish()
    }
}

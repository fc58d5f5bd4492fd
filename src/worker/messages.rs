//! Worker message types for cross-thread communication.
//!
//! Requests carry the time they were sent so the worker can log how long
//! they sat in its queue.

use crate::domain::Document;
use serde::{Deserialize, Serialize};

/// Name under which the worker is registered with Zellij.
pub const WORKER_NAME: &str = "library";

/// Current time in milliseconds since the epoch.
fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generates builder methods for `WorkerMessage` variants that stamp the
/// send time.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message stamped with the current time")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        sent_at: now_millis(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_library(LoadLibrary { library_dir: String }),
    reload_document(ReloadDocument { index: usize, folder: String }),
}

/// Requests sent from the plugin to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Scan the library rooted at `library_dir`.
    LoadLibrary {
        /// Sandbox path of the library root.
        library_dir: String,
        /// Milliseconds since the epoch when the request was sent.
        sent_at: i64,
    },

    /// Re-read one document after its info file was edited.
    ReloadDocument {
        /// Position of the document in the loaded library.
        index: usize,
        /// Sandbox path of the document folder.
        folder: String,
        sent_at: i64,
    },
}

impl WorkerMessage {
    /// Send time of the request.
    #[must_use]
    pub const fn sent_at(&self) -> i64 {
        match self {
            Self::LoadLibrary { sent_at, .. } | Self::ReloadDocument { sent_at, .. } => *sent_at,
        }
    }
}

/// Responses sent from the worker back to the plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// The library was scanned.
    LibraryLoaded {
        /// Documents ordered by folder path.
        documents: Vec<Document>,
    },

    /// A document was re-read.
    DocumentReloaded {
        index: usize,
        document: Document,
    },

    /// The request failed.
    Error {
        /// Human-readable error message.
        message: String,
    },
}

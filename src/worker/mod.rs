//! Background worker for library I/O.
//!
//! Scanning the library and re-reading documents happen on Zellij's worker
//! thread so the plugin never blocks its render loop on disk access.
//!
//! - `messages`: Request/response protocol exchanged as JSON
//! - `handler`: Worker state and message processing

pub mod handler;
pub mod messages;

pub use handler::LibraryWorker;
pub use messages::{WorkerMessage, WorkerResponse, WORKER_NAME};

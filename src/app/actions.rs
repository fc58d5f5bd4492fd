//! Actions representing side effects to be executed by the plugin runtime.
//!
//! Key handlers and the event handler never call Zellij directly. They return
//! a `Vec<Action>` which the plugin shim executes in order, keeping the
//! application layer testable off the WASM target.
//!
//! # Example
//!
//! ```rust
//! use bibshelf::app::Action;
//! use bibshelf::worker::WorkerMessage;
//!
//! let actions = vec![
//!     Action::PostToWorker(WorkerMessage::load_library("/host/papers".to_string())),
//! ];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::worker::WorkerMessage;
use std::path::PathBuf;

/// Commands representing side effects to be executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Closes the plugin pane.
    Close,

    /// Runs the opener on the attached files of a document.
    OpenFiles {
        /// Opener command line, e.g. `xdg-open`.
        command: String,
        /// Sandbox paths of the files to open.
        paths: Vec<PathBuf>,
    },

    /// Opens the info file of a document in the editor.
    ///
    /// Input stays blocked until the editor pane exits, after which the
    /// document at `index` is reloaded.
    EditInfo {
        /// Library index of the edited document.
        index: usize,
        /// Editor command line, e.g. `vi`.
        editor: String,
        /// Sandbox path of the info file.
        path: PathBuf,
    },

    /// Posts a message to the library worker.
    PostToWorker(WorkerMessage),
}

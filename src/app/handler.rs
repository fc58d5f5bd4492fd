//! Event handling and state transition logic.
//!
//! The plugin shim translates Zellij events into [`Event`]s and hands them to
//! [`handle_event`], which mutates the [`AppState`] and returns whether the
//! pane needs a re-render along with the actions to execute.
//!
//! # Event Types
//!
//! - **Input**: `Key`, ignored while an edit is pending except for the exit key
//! - **Processes**: `EditorExited`, `OpenFinished`
//! - **System**: `PermissionsResult`
//! - **Worker**: `WorkerResponse` with typed message variants
//!
//! # Example
//!
//! ```rust
//! use bibshelf::app::keymap::KeyChord;
//! use bibshelf::{handle_event, initialize, Action, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//! let (_render, actions) = handle_event(&mut state, &Event::Key(KeyChord::ctrl('q')))?;
//! assert_eq!(actions, vec![Action::Close]);
//! # Ok::<(), bibshelf::BibshelfError>(())
//! ```

use crate::app::keymap::KeyChord;
use crate::app::{Action, AppState};
use crate::domain::error::{BibshelfError, Result};
use crate::worker::WorkerResponse;

/// Events triggered by user input, child processes, or worker responses.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A key press.
    Key(KeyChord),

    /// The editor pane opened by an edit action exited.
    EditorExited {
        /// Exit status, if the process exited normally.
        exit_code: Option<i32>,
    },

    /// The opener command finished.
    OpenFinished {
        exit_code: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },

    /// Outcome of the permission request made on load.
    PermissionsResult {
        /// Whether every requested permission was granted.
        granted: bool,
    },

    /// Wraps a response from the library worker.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// The boolean is `true` when the pane should be re-rendered.
///
/// # Errors
///
/// Returns an error when a worker response refers to a document that is not
/// loaded.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::Key(chord) => {
            if state.is_blocked() && !state.is_exit_key(chord) {
                tracing::debug!(key = ?chord, "editor running, ignoring key");
                return Ok((false, vec![]));
            }
            let actions = state.handle_key(*chord);
            Ok((true, actions))
        }
        Event::EditorExited { exit_code } => Ok((true, state.finish_edit(*exit_code))),
        Event::OpenFinished { exit_code, stderr } => {
            if *exit_code == Some(0) {
                tracing::debug!("opener finished");
                return Ok((false, vec![]));
            }
            tracing::warn!(exit_code = ?exit_code, stderr = %stderr, "opener failed");
            let message = stderr.trim();
            state.prompt.echo(if message.is_empty() { "Opener failed" } else { message });
            Ok((true, vec![]))
        }
        Event::PermissionsResult { granted } => {
            if *granted {
                tracing::debug!(library_dir = %state.library_dir(), "permissions granted, loading library");
                Ok((false, vec![state.load_request()]))
            } else {
                tracing::warn!("permissions denied");
                state.prompt.echo("Permissions denied, the library cannot be read");
                Ok((true, vec![]))
            }
        }
        Event::WorkerResponse(response) => handle_worker_response(state, response),
    }
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> Result<(bool, Vec<Action>)> {
    match response {
        WorkerResponse::LibraryLoaded { documents } => {
            tracing::debug!(count = documents.len(), "library loaded");
            state.set_library(documents.clone());
            Ok((true, vec![]))
        }
        WorkerResponse::DocumentReloaded { index, document } => {
            if *index >= state.list.documents().len() {
                return Err(BibshelfError::Worker(format!(
                    "reloaded document {index} is not loaded"
                )));
            }
            tracing::debug!(index, folder = %document.folder, "document reloaded");
            state.replace_document(*index, document.clone());
            Ok((true, vec![]))
        }
        WorkerResponse::Error { message } => {
            tracing::warn!(error = %message, "worker error");
            state.prompt.echo(message);
            Ok((true, vec![]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::keymap::KeyCode;
    use crate::domain::Document;
    use crate::ui::Theme;
    use crate::worker::WorkerMessage;
    use crate::Config;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn document(title: &str) -> Document {
        let mut info = BTreeMap::new();
        info.insert("title".to_string(), json!(title));
        Document::new(format!("/host/papers/{title}"), info)
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::new(&Config::default(), Theme::default());
        state.layout(30, 80);
        let documents = vec![document("alpha"), document("beta"), document("gamma")];
        handle_event(&mut state, &Event::WorkerResponse(WorkerResponse::LibraryLoaded { documents })).unwrap();
        state
    }

    fn key(state: &mut AppState, chord: KeyChord) -> (bool, Vec<Action>) {
        handle_event(state, &Event::Key(chord)).unwrap()
    }

    #[test]
    fn permissions_granted_requests_the_library() {
        let mut state = AppState::new(&Config::default(), Theme::default());
        let (render, actions) = handle_event(&mut state, &Event::PermissionsResult { granted: true }).unwrap();
        assert!(!render);
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::LoadLibrary { .. })]
        ));
    }

    #[test]
    fn permissions_denied_is_echoed() {
        let mut state = AppState::new(&Config::default(), Theme::default());
        let (render, actions) = handle_event(&mut state, &Event::PermissionsResult { granted: false }).unwrap();
        assert!(render);
        assert!(actions.is_empty());
        assert!(state.prompt.text().starts_with("Permissions denied"));
    }

    #[test]
    fn loaded_library_is_displayed() {
        let state = loaded_state();
        assert_eq!(state.list.displayed(), &[0, 1, 2]);
        assert_eq!(state.list.selected_index(), Some(0));
    }

    #[test]
    fn keys_are_ignored_while_editing() {
        let mut state = loaded_state();
        key(&mut state, KeyChord::char('j'));
        let (_, actions) = key(&mut state, KeyChord::char('e'));
        assert_eq!(actions.len(), 1);

        let (render, actions) = key(&mut state, KeyChord::char('j'));
        assert!(!render);
        assert!(actions.is_empty());
        assert_eq!(state.list.selection(), 1);

        let (_, actions) = handle_event(&mut state, &Event::EditorExited { exit_code: Some(0) }).unwrap();
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::ReloadDocument { index: 1, .. })]
        ));

        key(&mut state, KeyChord::char('j'));
        assert_eq!(state.list.selection(), 2);
    }

    #[test]
    fn exit_still_works_while_editing() {
        let mut state = loaded_state();
        key(&mut state, KeyChord::char('e'));
        assert!(state.is_blocked());

        let (_, actions) = key(&mut state, KeyChord::char('q'));
        assert!(actions.is_empty());
        let (_, actions) = key(&mut state, KeyChord::ctrl('q'));
        assert_eq!(actions, vec![Action::Close]);
    }

    #[test]
    fn reloaded_document_replaces_label() {
        let mut state = loaded_state();
        let response = WorkerResponse::DocumentReloaded {
            index: 1,
            document: document("beta-revised"),
        };
        handle_event(&mut state, &Event::WorkerResponse(response)).unwrap();
        assert_eq!(state.list.documents()[1].get("title"), "beta-revised");
        assert_eq!(state.list.label(1).map(|l| l.lines[0].clone()).as_deref(), Some("beta-revised"));
    }

    #[test]
    fn reload_out_of_range_is_an_error() {
        let mut state = loaded_state();
        let response = WorkerResponse::DocumentReloaded {
            index: 9,
            document: document("ghost"),
        };
        let err = handle_event(&mut state, &Event::WorkerResponse(response)).unwrap_err();
        assert!(matches!(err, BibshelfError::Worker(_)));
    }

    #[test]
    fn worker_errors_and_failed_opens_are_echoed() {
        let mut state = loaded_state();
        let response = WorkerResponse::Error {
            message: "library directory /host/nope does not exist".to_string(),
        };
        handle_event(&mut state, &Event::WorkerResponse(response)).unwrap();
        assert!(state.prompt.text().contains("does not exist"));

        let event = Event::OpenFinished {
            exit_code: Some(4),
            stderr: "xdg-open: no method available\n".to_string(),
        };
        let (render, _) = handle_event(&mut state, &event).unwrap();
        assert!(render);
        assert_eq!(state.prompt.text(), "xdg-open: no method available");
    }

    #[test]
    fn typing_after_echo_replaces_the_message() {
        let mut state = loaded_state();
        key(&mut state, KeyChord::char('h'));
        assert!(state.prompt.height() > 1);

        key(&mut state, KeyChord::char(':'));
        key(&mut state, KeyChord::char('g'));
        key(&mut state, KeyChord::new(KeyCode::Enter));
        assert_eq!(state.prompt.text(), "g");
        assert_eq!(state.prompt.height(), 1);
        assert_eq!(state.list.matched(), &[2]);
    }
}

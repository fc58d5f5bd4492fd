//! Zellij plugin wrapper and entry point.
//!
//! This module is the thin integration layer between the bibshelf library and
//! the Zellij plugin system. It implements `ZellijPlugin` and `ZellijWorker`,
//! translates Zellij events into library events and executes the resulting
//! actions with Zellij API calls.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────┐
//! │   Zellij Main Thread    │
//! │  ┌──────────────────┐   │
//! │  │  State (plugin)  │   │  ← UI state, key dispatch
//! │  └──────────────────┘   │
//! │          │              │
//! │          │ IPC          │
//! │          ▼              │
//! │  ┌──────────────────┐   │
//! │  │  LibraryWorker   │   │  ← Library scan and reloads
//! │  │ (worker thread)  │   │
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, create `AppState`
//! 2. **Subscribe**: Key, `CustomMessage`, `CommandPaneExited`,
//!    `RunCommandResult`, `PermissionRequestResult`
//! 3. **Permissions**: once granted, ask the worker to load the library
//! 4. **Update**: Map events, delegate to `handle_event`, execute actions
//! 5. **Render**: Lay the list out for the pane, then draw
//!
//! # Event Mapping
//!
//! - `Key` → `Event::Key` with the chord (shifted letters uppercase)
//! - `CustomMessage` from the worker → `Event::WorkerResponse`
//! - `CommandPaneExited` of the editor pane → `Event::EditorExited`
//! - `RunCommandResult` of the opener → `Event::OpenFinished`
//! - `PermissionRequestResult` → `Event::PermissionsResult`
//!
//! # Host Paths
//!
//! Inside the sandbox the host working directory is mounted at `/host`.
//! Commands run on the host, so sandbox paths are mapped back onto the
//! plugin's initial working directory before being handed to them.

#![allow(clippy::multiple_crate_versions)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use zellij_tile::prelude::*;
use zellij_tile::shim::{post_message_to, post_message_to_plugin};

use bibshelf::app::{KeyChord, KeyCode};
use bibshelf::infrastructure::host_relative;
use bibshelf::worker::{LibraryWorker, WorkerMessage, WorkerResponse, WORKER_NAME};
use bibshelf::{handle_event, Action, Config, Event};

/// Context key marking the editor command pane.
const EDIT_CONTEXT: &str = "bibshelf_edit";

/// Context key marking opener commands.
const OPEN_CONTEXT: &str = "bibshelf_open";

// Register plugin and worker with Zellij
register_plugin!(State);
register_worker!(LibraryWorkerShim, library_worker, LIBRARY_WORKER);

/// Zellij worker wrapper around [`LibraryWorker`].
#[derive(Default, Serialize, Deserialize)]
struct LibraryWorkerShim {
    #[serde(skip)]
    inner: LibraryWorker,
}

impl<'de> ZellijWorker<'de> for LibraryWorkerShim {
    fn on_message(&mut self, message: String, payload: String) {
        if message != WORKER_NAME {
            tracing::debug!(message_name = %message, "worker ignoring unknown message");
            return;
        }
        if let Some(response) = self.inner.handle_payload(&payload) {
            post_message_to_plugin(PluginMessage {
                name: WORKER_NAME.to_string(),
                payload: response,
                worker_name: None,
            });
        }
    }
}

/// Plugin state wrapper.
///
/// Wraps the library's `AppState` with Zellij-specific concerns.
struct State {
    /// Core application state from library layer.
    app: bibshelf::app::AppState,

    /// Host directory mounted at `/host`.
    host_cwd: PathBuf,
}

impl Default for State {
    fn default() -> Self {
        Self {
            app: bibshelf::initialize(&Config::default()),
            host_cwd: PathBuf::new(),
        }
    }
}

impl ZellijPlugin for State {
    /// Parses configuration, initializes tracing and state, requests
    /// permissions and subscribes to events.
    ///
    /// The library is requested once permissions are granted.
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        bibshelf::observability::init_tracing(&config);

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        tracing::debug!(library_dir = %config.library_dir, match_mode = ?config.match_mode, "parsed configuration");
        self.app = bibshelf::initialize(&config);
        self.host_cwd = get_plugin_ids().initial_cwd;

        request_permission(&[
            PermissionType::RunCommands,
            PermissionType::OpenTerminalsOrPlugins,
            PermissionType::FullHdAccess,
        ]);

        subscribe(&[
            EventType::Key,
            EventType::CustomMessage,
            EventType::CommandPaneExited,
            EventType::RunCommandResult,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    /// Handles incoming Zellij events.
    ///
    /// Returns `true` if the UI should re-render.
    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span = tracing::debug_span!("plugin_update_event", event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match Self::map_key(key) {
                Some(chord) => Event::Key(chord),
                None => return false,
            },
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match Self::map_custom_message_event(&message, &payload) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::CommandPaneExited(pane_id, exit_code, context) => {
                if !context.contains_key(EDIT_CONTEXT) {
                    return false;
                }
                tracing::debug!(pane_id, exit_code = ?exit_code, "editor pane exited");
                close_terminal_pane(pane_id);
                Event::EditorExited { exit_code }
            }
            zellij_tile::prelude::Event::RunCommandResult(exit_code, _stdout, stderr, context) => {
                if !context.contains_key(OPEN_CONTEXT) {
                    return false;
                }
                Event::OpenFinished {
                    exit_code,
                    stderr: String::from_utf8_lossy(&stderr).into_owned(),
                }
            }
            zellij_tile::prelude::Event::PermissionRequestResult(status) => Event::PermissionsResult {
                granted: matches!(status, PermissionStatus::Granted),
            },
            _ => return false,
        };

        match handle_event(&mut self.app, &our_event) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render, "event handled");
                for a in actions {
                    self.execute_action(&a);
                }
                should_render
            }
            Err(e) => {
                tracing::warn!(error = %e, "error handling event");
                false
            }
        }
    }

    fn render(&mut self, rows: usize, cols: usize) {
        self.app.layout(rows, cols);
        bibshelf::ui::render(&self.app, rows, cols);
    }
}

impl State {
    /// Gets a string name for a Zellij event for logging purposes.
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::CommandPaneExited(..) => "CommandPaneExited".to_string(),
            zellij_tile::prelude::Event::RunCommandResult(..) => "RunCommandResult".to_string(),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                "PermissionRequestResult".to_string()
            }
            _ => "Other".to_string(),
        }
    }

    /// Maps a Zellij key to a chord. Shift is folded into the character.
    fn map_key(key: &KeyWithModifier) -> Option<KeyChord> {
        let code = match key.bare_key {
            BareKey::Char(c) if key.key_modifiers.contains(&KeyModifier::Shift) => {
                KeyCode::Char(c.to_ascii_uppercase())
            }
            BareKey::Char(c) => KeyCode::Char(c),
            BareKey::Enter => KeyCode::Enter,
            BareKey::Esc => KeyCode::Esc,
            BareKey::Tab => KeyCode::Tab,
            BareKey::Backspace => KeyCode::Backspace,
            BareKey::Delete => KeyCode::Delete,
            BareKey::Up => KeyCode::Up,
            BareKey::Down => KeyCode::Down,
            BareKey::Left => KeyCode::Left,
            BareKey::Right => KeyCode::Right,
            BareKey::Home => KeyCode::Home,
            BareKey::End => KeyCode::End,
            BareKey::PageUp => KeyCode::PageUp,
            BareKey::PageDown => KeyCode::PageDown,
            _ => {
                tracing::debug!(bare_key = ?key.bare_key, "unmapped key");
                return None;
            }
        };
        Some(KeyChord {
            code,
            ctrl: key.key_modifiers.contains(&KeyModifier::Ctrl),
            alt: key.key_modifiers.contains(&KeyModifier::Alt),
        })
    }

    /// Maps worker messages to application events.
    fn map_custom_message_event(message: &str, payload: &str) -> Option<Event> {
        if message != WORKER_NAME {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            return None;
        }
        match serde_json::from_str::<WorkerResponse>(payload) {
            Ok(response) => Some(Event::WorkerResponse(response)),
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize worker response");
                None
            }
        }
    }

    /// Absolute host path of a sandbox path.
    fn host_path(&self, path: &Path) -> PathBuf {
        self.host_cwd.join(host_relative(path))
    }

    /// Posts a message to the worker thread.
    fn post_worker_message(message: &WorkerMessage) {
        match serde_json::to_string(message) {
            Ok(payload) => {
                tracing::debug!(payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(WORKER_NAME.to_string()),
                    name: WORKER_NAME.to_string(),
                    payload,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize worker message");
            }
        }
    }

    /// Executes an action returned from event handling.
    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&self, action: &Action) {
        match action {
            Action::Close => {
                tracing::debug!("closing plugin");
                close_self();
            }
            Action::OpenFiles { command, paths } => {
                let mut args: Vec<String> = command.split_whitespace().map(str::to_string).collect();
                if args.is_empty() {
                    tracing::warn!("empty opener command");
                    return;
                }
                args.extend(paths.iter().map(|p| self.host_path(p).to_string_lossy().into_owned()));
                tracing::debug!(args = ?args, "running opener");

                let argv: Vec<&str> = args.iter().map(String::as_str).collect();
                let context = BTreeMap::from([(OPEN_CONTEXT.to_string(), String::new())]);
                run_command(&argv, context);
            }
            Action::EditInfo { index, editor, path } => {
                let mut words = editor.split_whitespace().map(str::to_string);
                let Some(program) = words.next() else {
                    tracing::warn!("empty editor command");
                    return;
                };
                let mut args: Vec<String> = words.collect();
                args.push(self.host_path(path).to_string_lossy().into_owned());
                tracing::debug!(index, program = %program, args = ?args, "opening editor pane");

                let context = BTreeMap::from([(EDIT_CONTEXT.to_string(), index.to_string())]);
                open_command_pane_floating(
                    CommandToRun {
                        path: PathBuf::from(program),
                        args,
                        cwd: Some(self.host_cwd.clone()),
                    },
                    None,
                    context,
                );
            }
            Action::PostToWorker(message) => Self::post_worker_message(message),
        }
    }
}

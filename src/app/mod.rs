//! Application layer coordinating state, events, and actions.
//!
//! Sits between the plugin runtime (main.rs) and the domain, worker and UI
//! layers.
//!
//! ```text
//! Zellij Event → Event → handle_event → AppState (keymap → handlers) → Actions
//!                   ↑                                                     ↓
//!                   └─────────────── Worker Responses ────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effects executed by the plugin runtime
//! - [`handler`]: Event processing
//! - [`keymap`]: Key patterns, commands and the binding table
//! - [`modes`]: Shared modal state and widget focus
//! - [`prompt`]: Command prompt widget
//! - [`state`]: Application state, key actions and view model computation
//! - [`viewport`]: Filtered, windowed document list

pub mod actions;
pub mod handler;
pub mod keymap;
pub mod modes;
pub mod prompt;
pub mod state;
pub mod viewport;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use keymap::{Command, KeyChord, KeyCode, Keymap};
pub use modes::{Focus, Mode, ModeHandle};
pub use state::AppState;

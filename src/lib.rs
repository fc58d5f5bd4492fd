//! Bibshelf: a Zellij plugin for browsing a document library with vim-style keys.
//!
//! Bibshelf shows a personal paper library in a Zellij pane and provides:
//! - A command prompt whose text filters the library as you type
//! - A virtualized list of document labels with a scroll window
//! - Actions to open a document's files, edit its `info.yaml` and print its info
//! - Modal keybindings (normal / command) configurable from the layout
//! - Library scanning and reloading on a Zellij worker thread

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Modes, keymap and dispatch                       │
//! │  - Prompt and document list window                  │
//! │  - Event handling and view model computation        │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Library Layer │   │ Worker Layer  │
//! │ (ui/)         │   │ (library/)    │   │ (worker/)     │
//! │ - Rendering   │   │ - Folder scan │   │ - Load/reload │
//! │ - Theming     │   │ - Store trait │   │ - IPC bridge  │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Sandbox paths (infrastructure/)                  │
//! │  - Document, templates, matcher, errors (domain/)   │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing subscriber writing a rotating log file   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/bibshelf.wasm" {
//!         library_dir "~/Documents/papers"
//!         header_format "{doc[title]}\n    {doc[author]} ({doc[year]})"
//!         match_mode "fuzzy"
//!         opener "zathura"
//!         editor "nvim"
//!         key_move_down "<Control-j>"
//!         theme "catppuccin-latte"
//!         trace_level "debug"
//!     }
//! }
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Plugin Load** (`main.rs`): parse configuration, initialize tracing,
//!    create `AppState`, request permissions and subscribe to events.
//! 2. **Permissions Granted**: post `LoadLibrary` to the worker.
//! 3. **Worker Processing**: walk `library_dir` for `info.yaml` files and
//!    answer with `LibraryLoaded`.
//! 4. **First Render**: lay the list out for the pane size and draw the
//!    window of matching documents.
//!
//! # Example
//!
//! ```rust
//! use bibshelf::app::keymap::KeyChord;
//! use bibshelf::{handle_event, initialize, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//! for c in ":knuth".chars() {
//!     let (_render, _actions) = handle_event(&mut state, &Event::Key(KeyChord::char(c)))?;
//! }
//! assert_eq!(state.prompt.text(), "knuth");
//! # Ok::<(), bibshelf::BibshelfError>(())
//! ```
//!
//! # Platform Support
//!
//! - **Target**: `wasm32-wasip1` (Zellij WASM runtime)
//! - **Host paths**: the host working directory is mounted at `/host`

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod library;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event};
pub use domain::{BibshelfError, Document, MatchMode, Result};
pub use ui::Theme;

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

const DEFAULT_LIBRARY_DIR: &str = "~/Documents/papers";
const DEFAULT_MATCH_FORMAT: &str = "{doc[tags]}{doc.subfolder}{doc[title]}{doc[author]}{doc[year]}";
const DEFAULT_HEADER_FORMAT: &str = "{doc[title]}\n    {doc[author]} ({doc[year]})";

/// Plugin configuration parsed from Zellij's configuration system.
///
/// Every option has a default; a missing or malformed value never fails
/// plugin startup.
///
/// ```kdl
/// plugin location="file:/path/to/bibshelf.wasm" {
///     library_dir "~/papers"
///     match_mode "regex"
///     entry_padding "1"
///     entry_bg_1 "#303446"
///     opener "xdg-open"
///     editor "vi"
///     theme_file "/path/to/theme.toml"
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Sandbox path of the library root. Default: `~/Documents/papers`
    pub library_dir: String,

    /// Template each document is rendered with before matching.
    pub match_format: String,

    /// Template of the document labels. A literal `\n` starts a new line.
    pub header_format: String,

    /// How queries are matched. Default: regex
    pub match_mode: MatchMode,

    /// Blank lines below each label. Default: 0
    pub entry_padding: usize,

    /// Alternating label backgrounds overriding the theme.
    pub entry_bg: [Option<String>; 2],

    /// Command opening attached files. Default: `xdg-open`
    pub opener: String,

    /// Command editing info files. Default: `vi`
    pub editor: String,

    /// Built-in theme name.
    ///
    /// Options: `catppuccin-mocha`, `catppuccin-latte`, `catppuccin-frappe`,
    /// `catppuccin-macchiato`. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file. Takes precedence over `theme_name`.
    pub theme_file: Option<String>,

    /// `EnvFilter` directive for the log file. Default: `"info"`
    pub trace_level: String,

    options: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_zellij(&BTreeMap::new())
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Unparseable values fall back to their defaults.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use bibshelf::{Config, MatchMode};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("library_dir".to_string(), "~/papers".to_string());
    /// map.insert("match_mode".to_string(), "fuzzy".to_string());
    /// map.insert("entry_padding".to_string(), "many".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.library_dir, "/host/papers");
    /// assert_eq!(config.match_mode, MatchMode::Fuzzy);
    /// assert_eq!(config.entry_padding, 0);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let mut parsed = Self {
            library_dir: String::new(),
            match_format: String::new(),
            header_format: String::new(),
            match_mode: MatchMode::default(),
            entry_padding: 0,
            entry_bg: [None, None],
            opener: String::new(),
            editor: String::new(),
            theme_name: None,
            theme_file: None,
            trace_level: String::new(),
            options: config.clone(),
        };

        parsed.library_dir = infrastructure::expand_tilde(&parsed.get("library_dir", DEFAULT_LIBRARY_DIR));
        parsed.match_format = unescape(&parsed.get("match_format", DEFAULT_MATCH_FORMAT));
        parsed.header_format = unescape(&parsed.get("header_format", DEFAULT_HEADER_FORMAT));
        parsed.match_mode = parsed.get_or("match_mode", MatchMode::default());
        parsed.entry_padding = parsed.get_or("entry_padding", 0);
        parsed.entry_bg = [parsed.optional("entry_bg_1"), parsed.optional("entry_bg_2")];
        parsed.opener = parsed.get("opener", "xdg-open");
        parsed.editor = parsed.get("editor", "vi");
        parsed.theme_name = parsed.optional("theme");
        parsed.theme_file = parsed.optional("theme_file").map(|f| infrastructure::expand_tilde(&f));
        parsed.trace_level = parsed.get("trace_level", "info");
        parsed
    }

    /// Raw value of `key`, or `default` when unset or blank.
    #[must_use]
    pub fn get(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Value of `key` parsed as `T`, or `default` when unset or unparseable.
    #[must_use]
    pub fn get_or<T>(&self, key: &str, default: T) -> T
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.try_get(key) {
            Ok(value) => value.unwrap_or(default),
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "invalid option, using default");
                default
            }
        }
    }

    /// Value of `key` parsed as `T`, or `None` when unset or blank.
    ///
    /// # Errors
    ///
    /// Returns [`BibshelfError::Config`] if the value does not parse.
    pub fn try_get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        let Some(raw) = self.optional(key) else {
            return Ok(None);
        };
        raw.trim()
            .parse()
            .map(Some)
            .map_err(|e| BibshelfError::Config(format!("invalid value '{raw}' for {key}: {e}")))
    }

    fn optional(&self, key: &str) -> Option<String> {
        self.options
            .get(key)
            .filter(|value| !value.trim().is_empty())
            .cloned()
    }
}

/// Turns literal `\n` and `\t` sequences into the characters they name.
fn unescape(template: &str) -> String {
    template.replace("\\n", "\n").replace("\\t", "\t")
}

/// Initializes the application state for `config`.
///
/// The theme comes from `theme_file`, then `theme`, then the default; a theme
/// that fails to load is logged and replaced by the default. The library
/// starts empty until the worker answers.
///
/// ```rust
/// use bibshelf::{initialize, Config};
///
/// let state = initialize(&Config::default());
/// assert!(state.list.documents().is_empty());
/// ```
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(library_dir = %config.library_dir, "initializing bibshelf plugin");

    let theme = config.theme_file.as_ref().map_or_else(
        || {
            config.theme_name.as_ref().map_or_else(
                Theme::default,
                |theme_name| {
                    Theme::from_name(theme_name).unwrap_or_else(|| {
                        tracing::debug!(theme_name = %theme_name, "failed to load theme, using default");
                        Theme::default()
                    })
                },
            )
        },
        |theme_file| {
            Theme::from_file(theme_file).unwrap_or_else(|e| {
                tracing::debug!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            })
        },
    );

    AppState::new(config, theme)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let map = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_zellij(&map)
    }

    #[test]
    fn defaults_apply_to_an_empty_map() {
        let config = Config::default();
        assert_eq!(config.library_dir, "/host/Documents/papers");
        assert_eq!(config.header_format, "{doc[title]}\n    {doc[author]} ({doc[year]})");
        assert_eq!(config.match_mode, MatchMode::Regex);
        assert_eq!(config.opener, "xdg-open");
        assert_eq!(config.editor, "vi");
        assert_eq!(config.trace_level, "info");
        assert_eq!(config.entry_bg, [None, None]);
        assert!(config.theme_name.is_none());
    }

    #[test]
    fn header_format_accepts_escaped_newlines() {
        let config = config(&[("header_format", r"{doc[title]}\n  {doc[year]}")]);
        assert_eq!(config.header_format, "{doc[title]}\n  {doc[year]}");
    }

    #[test]
    fn malformed_values_fall_back() {
        let config = config(&[
            ("match_mode", "telepathic"),
            ("entry_padding", "-2"),
            ("editor", "   "),
            ("entry_bg_2", "#123456"),
        ]);
        assert_eq!(config.match_mode, MatchMode::Regex);
        assert_eq!(config.entry_padding, 0);
        assert_eq!(config.editor, "vi");
        assert_eq!(config.entry_bg, [None, Some("#123456".to_string())]);
    }

    #[test]
    fn get_returns_raw_options() {
        let config = config(&[("key_move_down", "<Control-j>")]);
        assert_eq!(config.get("key_move_down", "j"), "<Control-j>");
        assert_eq!(config.get("key_move_up", "k"), "k");
        assert_eq!(config.get_or("entry_padding", 3_usize), 3);
    }

    #[test]
    fn try_get_reports_unparseable_values() {
        let config = config(&[("entry_padding", "-2"), ("match_mode", "fuzzy")]);
        let err = config.try_get::<usize>("entry_padding").unwrap_err();
        assert!(matches!(err, BibshelfError::Config(ref message) if message.contains("entry_padding")));
        assert_eq!(config.try_get::<MatchMode>("match_mode").unwrap(), Some(MatchMode::Fuzzy));
        assert_eq!(config.try_get::<usize>("missing").unwrap(), None);
    }

    #[test]
    fn configured_backgrounds_override_the_theme() {
        let state = initialize(&config(&[("entry_bg_1", "#000000")]));
        let palette = &state.list.settings().palette;
        assert_eq!(palette[0], "#000000");
        assert_eq!(palette[1], state.theme.entry_palette()[1]);
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let state = initialize(&config(&[("theme", "solarized-nope")]));
        assert_eq!(state.theme, Theme::default());
    }
}

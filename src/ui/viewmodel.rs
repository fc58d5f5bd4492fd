//! View model types representing renderable UI state.
//!
//! View models are computed by `AppState::compute_viewmodel()` from the
//! current document window and prompt, and consumed by the renderer. They
//! hold display-ready data only.
//!
//! # Example
//!
//! ```rust
//! use bibshelf::ui::viewmodel::{EntryItem, HeaderInfo, PromptInfo, UIViewModel};
//!
//! let vm = UIViewModel {
//!     header: HeaderInfo {
//!         mode: "NORMAL".to_string(),
//!         title: " bibshelf (1/1) ".to_string(),
//!     },
//!     entries: vec![EntryItem {
//!         lines: vec!["Literate Programming".to_string(), "    Knuth (1984)".to_string()],
//!         background: "#1e1e2e".to_string(),
//!         is_selected: true,
//!         highlight_ranges: vec![vec![], vec![]],
//!     }],
//!     entry_height: 2,
//!     empty_state: None,
//!     prompt: PromptInfo {
//!         lines: vec![String::new()],
//!         command_mode: false,
//!     },
//! };
//! assert_eq!(vm.entries.len(), 1);
//! ```

/// Complete UI view model for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    /// Title bar content.
    pub header: HeaderInfo,

    /// Displayed entries, top to bottom.
    pub entries: Vec<EntryItem>,

    /// Rows taken by each entry, padding included.
    pub entry_height: usize,

    /// Message shown instead of the list when there is nothing to display.
    pub empty_state: Option<EmptyState>,

    /// Prompt content.
    pub prompt: PromptInfo,
}

/// One displayed document label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryItem {
    /// Label text, one element per line.
    pub lines: Vec<String>,

    /// Palette background assigned by the list.
    pub background: String,

    /// Whether this is the active entry.
    pub is_selected: bool,

    /// Per line, character ranges matched by the query.
    pub highlight_ranges: Vec<Vec<(usize, usize)>>,
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    /// Current mode label.
    pub mode: String,
    /// Centered title text.
    pub title: String,
}

/// Empty state message display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Primary message (e.g., "No documents match").
    pub message: String,

    /// Secondary explanatory text.
    pub subtitle: String,
}

/// Prompt display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptInfo {
    /// Prompt text, at least one line.
    pub lines: Vec<String>,

    /// Whether a query is being typed (shows the `:` marker and cursor).
    pub command_mode: bool,
}

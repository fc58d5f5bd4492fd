//! Input mode and focus state for the application.
//!
//! Exactly one [`Mode`] governs which key bindings are live at any moment.
//! Rather than a global, the mode lives in a [`ModeHandle`] that is created
//! once and cloned into every component that reads or changes it (the prompt,
//! the key dispatcher, the application state). All clones observe the same
//! value, and [`ModeHandle::set`] is the only way to change it.
//!
//! # Example
//!
//! ```rust
//! use bibshelf::app::modes::{Mode, ModeHandle};
//!
//! let mode = ModeHandle::default();
//! let prompt_view = mode.clone();
//!
//! mode.set(Mode::Command);
//! assert_eq!(prompt_view.get(), Mode::Command);
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Modal input state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Navigation and actions on the document list.
    #[default]
    Normal,
    /// Reserved for insert-mode bindings; no default binding enters it.
    Insert,
    /// Typing a filter query in the prompt.
    Command,
}

impl Mode {
    /// Label shown in the header.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Command => "COMMAND",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shared handle to the single process-wide mode value.
///
/// The plugin runs on one thread, so a reference-counted `Cell` is enough;
/// cloning the handle shares the underlying value.
#[derive(Clone, Default)]
pub struct ModeHandle(Rc<Cell<Mode>>);

impl ModeHandle {
    /// Creates a handle holding `mode`.
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self(Rc::new(Cell::new(mode)))
    }

    /// Current mode.
    #[must_use]
    pub fn get(&self) -> Mode {
        self.0.get()
    }

    /// Switches to `mode`. Setting the current mode again is a no-op.
    pub fn set(&self, mode: Mode) {
        if self.0.get() != mode {
            tracing::debug!(from = %self.0.get(), to = %mode, "mode changed");
            self.0.set(mode);
        }
    }

    /// Returns `true` if the current mode is `mode`.
    #[must_use]
    pub fn is(&self, mode: Mode) -> bool {
        self.get() == mode
    }
}

impl fmt::Debug for ModeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModeHandle").field(&self.get()).finish()
    }
}

/// Widget that currently receives typed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The document list (normal navigation).
    #[default]
    List,
    /// The command prompt.
    Prompt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_mode() {
        let a = ModeHandle::default();
        let b = a.clone();
        assert_eq!(b.get(), Mode::Normal);

        b.set(Mode::Command);
        assert!(a.is(Mode::Command));
    }

    #[test]
    fn set_is_idempotent() {
        let mode = ModeHandle::new(Mode::Insert);
        mode.set(Mode::Insert);
        mode.set(Mode::Insert);
        assert_eq!(mode.get(), Mode::Insert);
    }
}

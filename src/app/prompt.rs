//! Command prompt widget.
//!
//! The prompt is a small text buffer at the bottom of the pane. It serves two
//! purposes that share the same display area:
//!
//! - the live query typed in command mode, read through [`Prompt::command`]
//! - transient multi-line messages (document info, help) written with
//!   [`Prompt::echo`], which replace whatever was typed
//!
//! The query is only re-read while the shared mode is [`Mode::Command`];
//! outside of it [`Prompt::command`] returns the last captured value.

use crate::app::keymap::{KeyChord, KeyCode};
use crate::app::modes::{Mode, ModeHandle};

/// Text-entry widget with change tracking.
#[derive(Debug, Clone)]
pub struct Prompt {
    mode: ModeHandle,
    buffer: String,
    command: String,
    last_command: String,
    height: usize,
}

impl Prompt {
    /// Creates an empty one-line prompt observing the shared mode.
    #[must_use]
    pub fn new(mode: ModeHandle) -> Self {
        Self {
            mode,
            buffer: String::new(),
            command: String::new(),
            last_command: String::new(),
            height: 1,
        }
    }

    /// Empties the text and shrinks the display back to one line.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.height = 1;
    }

    /// Current command text.
    ///
    /// In command mode the text is captured from the buffer; in any other mode
    /// the previously captured value is returned unchanged. Either way the
    /// previous value becomes the baseline for [`Prompt::changed`].
    pub fn command(&mut self) -> &str {
        self.last_command.clone_from(&self.command);
        if self.mode.is(Mode::Command) {
            self.command.clone_from(&self.buffer);
        }
        &self.command
    }

    /// Re-reads the command and reports whether it differs from the previous
    /// read. Calling it twice without an edit in between yields `false` the
    /// second time.
    pub fn changed(&mut self) -> bool {
        self.command();
        self.last_command != self.command
    }

    /// Replaces the displayed content with `text`, sizing the display to its
    /// line count. Any typed text is discarded.
    pub fn echo(&mut self, text: &str) {
        self.clear();
        self.height = text.lines().count().max(1);
        self.buffer.push_str(text.trim_end_matches('\n'));
    }

    /// Applies an editing key while the prompt has focus.
    ///
    /// Printable characters are appended, `Backspace` deletes one character
    /// and `Ctrl+W` deletes the last word. Returns `true` if the key was
    /// consumed as an edit.
    pub fn edit(&mut self, chord: &KeyChord) -> bool {
        match (chord.code, chord.ctrl, chord.alt) {
            (KeyCode::Char(c), false, false) => {
                if self.height > 1 {
                    self.clear();
                }
                self.buffer.push(c);
                true
            }
            (KeyCode::Backspace, _, _) => {
                self.buffer.pop();
                true
            }
            (KeyCode::Char('w'), true, false) => {
                let trimmed = self.buffer.trim_end().len();
                let cut = self.buffer[..trimmed]
                    .char_indices()
                    .rev()
                    .find(|(_, c)| c.is_whitespace())
                    .map_or(0, |(i, c)| i + c.len_utf8());
                self.buffer.truncate(cut);
                true
            }
            _ => false,
        }
    }

    /// Last captured command, without re-reading the buffer.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.command
    }

    /// Displayed text (typed query or echoed message).
    #[must_use]
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Display height in lines.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }
}

//! Modal key binding table and dispatcher.
//!
//! Bindings are declared as `(key, command)` pairs. Each [`Command`] resolves
//! to its handler function once, when the binding is registered, so the same
//! table drives both dispatch and the help text printed by `print_help`.
//!
//! A binding fires only if
//! - its key pattern matches the pressed chord,
//! - its mode is unset or equals the mode observed when the key arrived,
//! - it is global, or its scope is the widget that currently has focus.
//!
//! Mode is checked at dispatch time, so several bindings may share a key as
//! long as their modes differ.
//!
//! # Key syntax
//!
//! Keys use the Tk event notation also accepted in the plugin configuration:
//!
//! ```text
//! j  :  G             single characters
//! <Down> <Return>     named keys
//! <Control-q>         Ctrl chord
//! <Shift-G>           shifted character (same as G)
//! <KeyPress>          any key
//! ```

use crate::app::modes::{Focus, Mode};
use crate::app::{Action, AppState};
use crate::Config;

/// Physical key without modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// Printable character; shifted letters are stored uppercase.
    Char(char),
    Enter,
    Esc,
    Tab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

/// A key press with its relevant modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub code: KeyCode,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyChord {
    /// Unmodified key.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            ctrl: false,
            alt: false,
        }
    }

    /// Unmodified character.
    #[must_use]
    pub const fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }

    /// `Ctrl` plus a character.
    #[must_use]
    pub const fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            ctrl: true,
            alt: false,
        }
    }
}

/// What a binding listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPattern {
    /// One specific chord.
    Chord(KeyChord),
    /// Every key press.
    Any,
}

impl KeyPattern {
    /// Parses a key in Tk notation. Returns `None` for unknown keys.
    ///
    /// ```
    /// use bibshelf::app::keymap::{KeyChord, KeyPattern};
    ///
    /// assert_eq!(KeyPattern::parse("<Control-q>"), Some(KeyPattern::Chord(KeyChord::ctrl('q'))));
    /// assert_eq!(KeyPattern::parse("<Shift-G>"), Some(KeyPattern::Chord(KeyChord::char('G'))));
    /// assert_eq!(KeyPattern::parse("<KeyPress>"), Some(KeyPattern::Any));
    /// assert_eq!(KeyPattern::parse("<Hyper-x>"), None);
    /// ```
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        let Some(inner) = key.strip_prefix('<').and_then(|s| s.strip_suffix('>')) else {
            let mut chars = key.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Self::Chord(KeyChord::char(c))),
                _ => None,
            };
        };

        if matches!(inner, "KeyPress" | "Key") {
            return Some(Self::Any);
        }

        let mut parts: Vec<&str> = inner.split('-').collect();
        // "<Control-minus>" style names aside, a trailing "-" means the key is '-'
        if inner.ends_with("--") || inner == "-" {
            parts.retain(|p| !p.is_empty());
            parts.push("-");
        }
        let keysym = parts.pop()?;
        let (mut ctrl, mut alt, mut shift) = (false, false, false);
        for modifier in parts {
            match modifier {
                "Control" | "Ctrl" => ctrl = true,
                "Alt" | "Meta" => alt = true,
                "Shift" => shift = true,
                _ => return None,
            }
        }

        let code = keysym_code(keysym)?;
        let code = match code {
            KeyCode::Char(c) if shift => KeyCode::Char(c.to_ascii_uppercase()),
            KeyCode::Char(c) if ctrl => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        Some(Self::Chord(KeyChord { code, ctrl, alt }))
    }

    fn matches(&self, chord: &KeyChord) -> bool {
        match self {
            Self::Any => true,
            Self::Chord(own) => own == chord,
        }
    }
}

fn keysym_code(keysym: &str) -> Option<KeyCode> {
    let code = match keysym {
        "Return" | "Enter" => KeyCode::Enter,
        "Escape" | "Esc" => KeyCode::Esc,
        "Tab" => KeyCode::Tab,
        "BackSpace" | "Backspace" => KeyCode::Backspace,
        "Delete" => KeyCode::Delete,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "Prior" | "PageUp" => KeyCode::PageUp,
        "Next" | "PageDown" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        "colon" => KeyCode::Char(':'),
        "slash" => KeyCode::Char('/'),
        "minus" => KeyCode::Char('-'),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(code)
}

/// Handler invoked when a binding fires.
pub type Handler = fn(&mut AppState) -> Vec<Action>;

/// Named application commands that keys can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    FocusPrompt,
    MoveDown,
    MoveUp,
    Open,
    Edit,
    Clear,
    MoveTop,
    MoveBottom,
    PrintHelp,
    PrintInfo,
    Exit,
    HalfDown,
    HalfUp,
    ScrollDown,
    ScrollUp,
    Autocomplete,
    ToNormal,
    RedrawScreen,
    FilterAndDraw,
    ClearPrompt,
}

impl Command {
    /// Name shown in the help text.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FocusPrompt => "focus_prompt",
            Self::MoveDown => "move_down",
            Self::MoveUp => "move_up",
            Self::Open => "open",
            Self::Edit => "edit",
            Self::Clear => "clear",
            Self::MoveTop => "move_top",
            Self::MoveBottom => "move_bottom",
            Self::PrintHelp => "print_help",
            Self::PrintInfo => "print_info",
            Self::Exit => "exit",
            Self::HalfDown => "half_down",
            Self::HalfUp => "half_up",
            Self::ScrollDown => "scroll_down",
            Self::ScrollUp => "scroll_up",
            Self::Autocomplete => "autocomplete",
            Self::ToNormal => "to_normal",
            Self::RedrawScreen => "redraw_screen",
            Self::FilterAndDraw => "filter_and_draw",
            Self::ClearPrompt => "clear_prompt",
        }
    }

    /// The function implementing the command.
    #[must_use]
    pub fn handler(self) -> Handler {
        match self {
            Self::FocusPrompt => AppState::focus_prompt,
            Self::MoveDown => AppState::move_down,
            Self::MoveUp => AppState::move_up,
            Self::Open => AppState::open,
            Self::Edit => AppState::edit,
            Self::Clear => AppState::clear,
            Self::MoveTop => AppState::move_top,
            Self::MoveBottom => AppState::move_bottom,
            Self::PrintHelp => AppState::print_help,
            Self::PrintInfo => AppState::print_info,
            Self::Exit => AppState::exit,
            Self::HalfDown => AppState::half_down,
            Self::HalfUp => AppState::half_up,
            Self::ScrollDown => AppState::scroll_down,
            Self::ScrollUp => AppState::scroll_up,
            Self::Autocomplete => AppState::autocomplete,
            Self::ToNormal => AppState::to_normal,
            Self::RedrawScreen => AppState::redraw_screen,
            Self::FilterAndDraw => AppState::filter_and_draw,
            Self::ClearPrompt => AppState::clear_prompt,
        }
    }
}

/// Configurable normal-mode bindings: `(option name, default key, command)`.
///
/// The option is looked up as `key_<name>` in the plugin configuration.
const DEFAULT_TABLE: &[(Option<&str>, &str, Command)] = &[
    (Some("focus_prompt"), ":", Command::FocusPrompt),
    (Some("move_down"), "j", Command::MoveDown),
    (Some("move_up"), "k", Command::MoveUp),
    (Some("open"), "o", Command::Open),
    (Some("edit"), "e", Command::Edit),
    (Some("clear"), "q", Command::Clear),
    (Some("move_top"), "g", Command::MoveTop),
    (Some("move_bottom"), "<Shift-G>", Command::MoveBottom),
    (Some("help"), "h", Command::PrintHelp),
    (Some("print_info"), "i", Command::PrintInfo),
    (Some("exit"), "<Control-q>", Command::Exit),
    (Some("half_down"), "<Control-d>", Command::HalfDown),
    (Some("half_up"), "<Control-u>", Command::HalfUp),
    (Some("scroll_down"), "<Control-e>", Command::ScrollDown),
    (Some("scroll_up"), "<Control-y>", Command::ScrollUp),
    (None, "<Down>", Command::MoveDown),
    (None, "<Up>", Command::MoveUp),
    (Some("autocomplete"), "<Tab>", Command::Autocomplete),
];

/// Where a binding listens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Fires whichever widget has focus.
    Global,
    /// Fires only while the given widget has focus.
    Widget(Focus),
}

/// A registered binding.
#[derive(Debug, Clone)]
pub struct Binding {
    pub pattern: KeyPattern,
    pub key: String,
    pub command: Command,
    pub handler: Handler,
    pub mode: Option<Mode>,
    pub scope: Scope,
}

/// The binding table.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Vec<Binding>,
    table: Vec<(String, Command)>,
}

impl Keymap {
    /// Creates an empty keymap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the full default keymap, taking table keys from `config`.
    ///
    /// A configured key that cannot be parsed falls back to the default key.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut keymap = Self::new();

        keymap.bind("<Return>", Command::ToNormal, Some(Mode::Command), true);
        keymap.bind("<Return>", Command::Open, Some(Mode::Normal), true);
        keymap.bind("<Escape>", Command::Clear, None, true);
        keymap.bind("<Control-l>", Command::RedrawScreen, None, true);
        keymap.bind("<Control-c>", Command::ToNormal, Some(Mode::Command), true);

        keymap.bind("<KeyPress>", Command::FilterAndDraw, Some(Mode::Command), false);
        keymap.bind("<Control-n>", Command::MoveDown, Some(Mode::Command), false);
        keymap.bind("<Control-p>", Command::MoveUp, Some(Mode::Command), false);
        keymap.bind("<Control-u>", Command::ClearPrompt, None, false);

        for &(option, default, command) in DEFAULT_TABLE {
            let key = option
                .map(|name| config.get(&format!("key_{name}"), default))
                .filter(|key| {
                    let valid = KeyPattern::parse(key).is_some();
                    if !valid {
                        tracing::warn!(key = %key, command = command.name(), "invalid key binding, using default");
                    }
                    valid
                })
                .unwrap_or_else(|| default.to_string());
            keymap.bind(&key, command, Some(Mode::Normal), true);
            keymap.table.push((key, command));
        }

        tracing::debug!(bindings = keymap.bindings.len(), "keymap built");
        keymap
    }

    /// Registers `command` on `key`.
    ///
    /// With `mode` set the binding fires only in that mode. A non-global
    /// binding is scoped to the prompt, the only widget that takes typed
    /// input, and fires only while it has focus. Unparseable keys are logged
    /// and ignored.
    pub fn bind(&mut self, key: &str, command: Command, mode: Option<Mode>, global: bool) {
        let scope = if global {
            Scope::Global
        } else {
            Scope::Widget(Focus::Prompt)
        };
        let Some(pattern) = KeyPattern::parse(key) else {
            tracing::warn!(key = %key, command = command.name(), "ignoring unparseable key");
            return;
        };
        self.bindings.push(Binding {
            pattern,
            key: key.to_string(),
            command,
            handler: command.handler(),
            mode,
            scope,
        });
    }

    /// Bindings that fire for `chord` given the mode at event time and the
    /// focused widget. Widget-scoped bindings come first, then global ones,
    /// each in registration order.
    #[must_use]
    pub fn dispatch(&self, chord: &KeyChord, mode: Mode, focus: Focus) -> Vec<&Binding> {
        let live = |b: &&Binding| b.pattern.matches(chord) && b.mode.map_or(true, |m| m == mode);

        let widget = self
            .bindings
            .iter()
            .filter(|b| b.scope == Scope::Widget(focus))
            .filter(live);
        let global = self
            .bindings
            .iter()
            .filter(|b| b.scope == Scope::Global)
            .filter(live);
        widget.chain(global).collect()
    }

    /// The declarative `(key, command)` table, for help output.
    #[must_use]
    pub fn table(&self) -> &[(String, Command)] {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn commands(keymap: &Keymap, chord: KeyChord, mode: Mode, focus: Focus) -> Vec<Command> {
        keymap
            .dispatch(&chord, mode, focus)
            .into_iter()
            .map(|b| b.command)
            .collect()
    }

    #[test]
    fn parses_tk_key_names() {
        assert_eq!(KeyPattern::parse("j"), Some(KeyPattern::Chord(KeyChord::char('j'))));
        assert_eq!(KeyPattern::parse(":"), Some(KeyPattern::Chord(KeyChord::char(':'))));
        assert_eq!(
            KeyPattern::parse("<Down>"),
            Some(KeyPattern::Chord(KeyChord::new(KeyCode::Down)))
        );
        assert_eq!(KeyPattern::parse("<Control-L>"), Some(KeyPattern::Chord(KeyChord::ctrl('l'))));
        assert_eq!(
            KeyPattern::parse("<Return>"),
            Some(KeyPattern::Chord(KeyChord::new(KeyCode::Enter)))
        );
        assert_eq!(KeyPattern::parse("jj"), None);
        assert_eq!(KeyPattern::parse(""), None);
        assert_eq!(KeyPattern::parse("<Control-Bogus>"), None);
    }

    #[test]
    fn same_key_in_different_modes_does_not_conflict() {
        let keymap = Keymap::from_config(&Config::default());
        let enter = KeyChord::new(KeyCode::Enter);

        assert_eq!(commands(&keymap, enter, Mode::Normal, Focus::List), vec![Command::Open]);
        assert_eq!(
            commands(&keymap, enter, Mode::Command, Focus::Prompt),
            vec![Command::FilterAndDraw, Command::ToNormal]
        );
    }

    #[test]
    fn normal_mode_keys_are_inert_while_typing() {
        let keymap = Keymap::from_config(&Config::default());
        assert_eq!(
            commands(&keymap, KeyChord::char('j'), Mode::Command, Focus::Prompt),
            vec![Command::FilterAndDraw]
        );
        assert_eq!(
            commands(&keymap, KeyChord::char('j'), Mode::Normal, Focus::List),
            vec![Command::MoveDown]
        );
    }

    #[test]
    fn widget_bindings_need_focus() {
        let keymap = Keymap::from_config(&Config::default());
        let ctrl_u = KeyChord::ctrl('u');

        assert_eq!(commands(&keymap, ctrl_u, Mode::Normal, Focus::List), vec![Command::HalfUp]);
        assert_eq!(
            commands(&keymap, ctrl_u, Mode::Command, Focus::Prompt),
            vec![Command::FilterAndDraw, Command::ClearPrompt]
        );
    }

    #[test]
    fn non_global_bindings_are_prompt_scoped() {
        let mut keymap = Keymap::new();
        keymap.bind("x", Command::PrintInfo, None, false);
        keymap.bind("y", Command::PrintHelp, None, true);

        let x = KeyChord::char('x');
        assert!(commands(&keymap, x, Mode::Normal, Focus::List).is_empty());
        assert_eq!(commands(&keymap, x, Mode::Normal, Focus::Prompt), vec![Command::PrintInfo]);
        assert_eq!(
            commands(&keymap, KeyChord::char('y'), Mode::Normal, Focus::List),
            vec![Command::PrintHelp]
        );
    }

    #[test]
    fn unmoded_bindings_fire_everywhere() {
        let keymap = Keymap::from_config(&Config::default());
        let esc = KeyChord::new(KeyCode::Esc);
        assert_eq!(commands(&keymap, esc, Mode::Normal, Focus::List), vec![Command::Clear]);
        assert_eq!(commands(&keymap, esc, Mode::Insert, Focus::List), vec![Command::Clear]);
    }

    #[test]
    fn configured_keys_replace_defaults_and_invalid_ones_fall_back() {
        let mut map = BTreeMap::new();
        map.insert("key_move_down".to_string(), "n".to_string());
        map.insert("key_open".to_string(), "<Nope-o>".to_string());
        let keymap = Keymap::from_config(&Config::from_zellij(&map));

        assert_eq!(
            commands(&keymap, KeyChord::char('n'), Mode::Normal, Focus::List),
            vec![Command::MoveDown]
        );
        assert!(commands(&keymap, KeyChord::char('j'), Mode::Normal, Focus::List).is_empty());
        assert_eq!(
            commands(&keymap, KeyChord::char('o'), Mode::Normal, Focus::List),
            vec![Command::Open]
        );
        assert!(keymap.table().iter().any(|(k, c)| k == "n" && *c == Command::MoveDown));
    }

    #[test]
    fn help_table_lists_every_default_entry() {
        let keymap = Keymap::from_config(&Config::default());
        assert_eq!(keymap.table().len(), DEFAULT_TABLE.len());
        assert_eq!(keymap.table()[0], (":".to_string(), Command::FocusPrompt));
    }
}

//! Application state and the actions bound to keys.
//!
//! [`AppState`] composes the shared mode, the prompt, the document list and
//! the keymap. Every [`Command`] resolves to one of the
//! `fn(&mut AppState) -> Vec<Action>` methods defined here; those
//! methods mutate the state and return the side effects the plugin shim has
//! to perform.
//!
//! # Key flow
//!
//! ```text
//! KeyChord → (prompt edit if focused) → Keymap::dispatch(mode, focus)
//!          → handlers in order → Vec<Action>
//! ```
//!
//! The mode and focus are read once when the key arrives, so a handler that
//! switches mode does not change which bindings fire for that same key.
//!
//! # Example
//!
//! ```rust
//! use bibshelf::app::keymap::KeyChord;
//! use bibshelf::app::modes::Mode;
//! use bibshelf::{initialize, Config};
//!
//! let mut state = initialize(&Config::default());
//! state.handle_key(KeyChord::char(':'));
//! assert_eq!(state.mode.get(), Mode::Command);
//! ```

use super::actions::Action;
use super::keymap::{Command, KeyChord, Keymap};
use super::modes::{Focus, Mode, ModeHandle};
use super::prompt::Prompt;
use super::viewport::{Direction, DocumentList, LabelState, ListSettings};
use crate::domain::Document;
use crate::ui::components::CHROME_ROWS;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{EmptyState, EntryItem, HeaderInfo, PromptInfo, UIViewModel};
use crate::worker::WorkerMessage;
use crate::Config;

/// Central application state.
#[derive(Debug)]
pub struct AppState {
    /// Shared modal state, also held by the prompt.
    pub mode: ModeHandle,

    /// Widget receiving typed input.
    pub focus: Focus,

    pub prompt: Prompt,

    /// Documents, matches and the displayed window.
    pub list: DocumentList,

    pub keymap: Keymap,

    /// Colours used by the renderer.
    pub theme: Theme,

    opener: String,
    editor: String,
    library_dir: String,

    /// Library index of the document open in the editor. Only the exit key
    /// gets through while set.
    pending_edit: Option<usize>,

    library_loaded: bool,
    laid_out: bool,
}

impl AppState {
    /// Creates the state for `config`, with an empty library.
    #[must_use]
    pub fn new(config: &Config, theme: Theme) -> Self {
        let mode = ModeHandle::default();
        let [bg1, bg2] = theme.entry_palette();
        let palette = [
            config.entry_bg[0].clone().unwrap_or(bg1),
            config.entry_bg[1].clone().unwrap_or(bg2),
        ];
        let settings = ListSettings {
            header_format: config.header_format.clone(),
            match_format: config.match_format.clone(),
            match_mode: config.match_mode,
            entry_padding: config.entry_padding,
            palette,
        };

        Self {
            prompt: Prompt::new(mode.clone()),
            mode,
            focus: Focus::List,
            list: DocumentList::new(settings),
            keymap: Keymap::from_config(config),
            theme,
            opener: config.opener.clone(),
            editor: config.editor.clone(),
            library_dir: config.library_dir.clone(),
            pending_edit: None,
            library_loaded: false,
            laid_out: false,
        }
    }

    /// The request that loads the configured library.
    #[must_use]
    pub fn load_request(&self) -> Action {
        Action::PostToWorker(WorkerMessage::load_library(self.library_dir.clone()))
    }

    /// Sandbox path of the library root.
    #[must_use]
    pub fn library_dir(&self) -> &str {
        &self.library_dir
    }

    /// Whether input is blocked by a running editor.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.pending_edit.is_some()
    }

    /// Whether `chord` fires the exit binding in the current mode and focus.
    #[must_use]
    pub fn is_exit_key(&self, chord: &KeyChord) -> bool {
        self.keymap
            .dispatch(chord, self.mode.get(), self.focus)
            .iter()
            .any(|b| b.command == Command::Exit)
    }

    /// Installs a freshly loaded library and shows it from the top.
    pub fn set_library(&mut self, documents: Vec<Document>) {
        self.list.set_documents(documents);
        self.list.recompute_matches(&mut self.prompt, true);
        self.library_loaded = true;
        if self.laid_out {
            self.list.render();
        }
    }

    /// Swaps in a reloaded document.
    pub fn replace_document(&mut self, index: usize, document: Document) {
        self.list.replace_document(index, document);
        if self.laid_out {
            self.list.render();
        }
    }

    /// Unblocks input after the editor exited and asks for a reload of the
    /// edited document.
    pub fn finish_edit(&mut self, exit_code: Option<i32>) -> Vec<Action> {
        let Some(index) = self.pending_edit.take() else {
            tracing::debug!("editor exit without a pending edit");
            return vec![];
        };
        tracing::debug!(index, exit_code = ?exit_code, "editor exited");
        if exit_code.is_some_and(|code| code != 0) {
            tracing::warn!(index, exit_code = ?exit_code, "editor exited with an error");
        }

        self.list
            .documents()
            .get(index)
            .map(|doc| {
                vec![Action::PostToWorker(WorkerMessage::reload_document(
                    index,
                    doc.folder.clone(),
                ))]
            })
            .unwrap_or_default()
    }

    /// Sizes the list to the pane.
    ///
    /// The first call, and every call that changes the rows left for
    /// entries, redraws the window.
    pub fn layout(&mut self, rows: usize, _cols: usize) {
        let list_rows = rows.saturating_sub(CHROME_ROWS + self.prompt.height());
        let changed = self.list.set_viewport(list_rows);
        if changed || !self.laid_out {
            tracing::debug!(rows, list_rows, capacity = self.list.capacity(), "layout changed");
            self.laid_out = true;
            self.list.redraw();
        }
    }

    /// Dispatches a key press.
    ///
    /// While the prompt has focus the key first edits its text, so bindings
    /// fired by the same key see the updated query.
    pub fn handle_key(&mut self, chord: KeyChord) -> Vec<Action> {
        let mode = self.mode.get();
        let focus = self.focus;
        if focus == Focus::Prompt {
            self.prompt.edit(&chord);
        }

        let bindings: Vec<_> = self
            .keymap
            .dispatch(&chord, mode, focus)
            .into_iter()
            .map(|b| (b.command, b.handler))
            .collect();

        let mut actions = vec![];
        for (command, handler) in bindings {
            tracing::debug!(command = command.name(), mode = %mode, "binding fired");
            actions.extend(handler(self));
        }
        actions
    }

    pub fn focus_prompt(&mut self) -> Vec<Action> {
        self.prompt.clear();
        self.focus = Focus::Prompt;
        self.mode.set(Mode::Command);
        vec![]
    }

    /// Returns input to the list.
    pub fn to_normal(&mut self) -> Vec<Action> {
        self.focus = Focus::List;
        self.mode.set(Mode::Normal);
        vec![]
    }

    /// Empties the prompt and returns to normal mode.
    pub fn clear(&mut self) -> Vec<Action> {
        self.prompt.clear();
        self.to_normal()
    }

    /// Empties the prompt and refilters.
    pub fn clear_prompt(&mut self) -> Vec<Action> {
        self.prompt.clear();
        self.filter_and_draw()
    }

    pub fn move_down(&mut self) -> Vec<Action> {
        self.list.step(Direction::Down);
        vec![]
    }

    pub fn move_up(&mut self) -> Vec<Action> {
        self.list.step(Direction::Up);
        vec![]
    }

    pub fn move_top(&mut self) -> Vec<Action> {
        self.list.move_to_top();
        vec![]
    }

    pub fn move_bottom(&mut self) -> Vec<Action> {
        self.list.move_to_bottom();
        vec![]
    }

    pub fn scroll_down(&mut self) -> Vec<Action> {
        self.list.scroll(Direction::Down);
        vec![]
    }

    pub fn scroll_up(&mut self) -> Vec<Action> {
        self.list.scroll(Direction::Up);
        vec![]
    }

    pub fn half_down(&mut self) -> Vec<Action> {
        tracing::debug!("half_down is not implemented");
        vec![]
    }

    pub fn half_up(&mut self) -> Vec<Action> {
        tracing::debug!("half_up is not implemented");
        vec![]
    }

    pub fn autocomplete(&mut self) -> Vec<Action> {
        tracing::debug!("autocomplete is not implemented");
        vec![]
    }

    pub fn redraw_screen(&mut self) -> Vec<Action> {
        self.list.redraw();
        vec![]
    }

    /// Refilters if the query changed and redraws the window.
    pub fn filter_and_draw(&mut self) -> Vec<Action> {
        self.list.recompute_matches(&mut self.prompt, false);
        self.list.redraw();
        vec![]
    }

    /// Opens the attached files of the selected document.
    pub fn open(&mut self) -> Vec<Action> {
        let Some(doc) = self.list.selected_document() else {
            tracing::debug!("open without a selected document");
            return vec![];
        };
        let paths = doc.files();
        if paths.is_empty() {
            self.prompt.echo("No files attached");
            return vec![];
        }
        tracing::debug!(folder = %doc.folder, files = paths.len(), "opening files");
        vec![Action::OpenFiles {
            command: self.opener.clone(),
            paths,
        }]
    }

    /// Opens the info file of the selected document in the editor.
    pub fn edit(&mut self) -> Vec<Action> {
        let (Some(index), Some(doc)) = (self.list.selected_index(), self.list.selected_document()) else {
            tracing::debug!("edit without a selected document");
            return vec![];
        };
        let path = doc.info_file();
        tracing::debug!(index, path = %path.display(), "editing info file");
        self.pending_edit = Some(index);
        vec![Action::EditInfo {
            index,
            editor: self.editor.clone(),
            path,
        }]
    }

    /// Shows the selected document's info in the prompt.
    pub fn print_info(&mut self) -> Vec<Action> {
        if let Some(text) = self.list.selected_document().map(Document::dump) {
            self.prompt.echo(&text);
        }
        vec![]
    }

    /// Shows the configurable bindings in the prompt.
    pub fn print_help(&mut self) -> Vec<Action> {
        let text = self
            .keymap
            .table()
            .iter()
            .map(|(key, command)| format!("{key}  -  {}\n", command.name()))
            .collect::<String>();
        self.prompt.echo(&text);
        vec![]
    }

    pub fn exit(&mut self) -> Vec<Action> {
        vec![Action::Close]
    }

    /// Computes the view model for the current window.
    #[must_use]
    pub fn compute_viewmodel(&self) -> UIViewModel {
        UIViewModel {
            header: self.compute_header(),
            entries: self.compute_entries(),
            entry_height: self.list.entry_height(),
            empty_state: self.compute_empty_state(),
            prompt: self.compute_prompt(),
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        HeaderInfo {
            mode: self.mode.get().label().to_string(),
            title: format!(
                " bibshelf ({}/{}) ",
                self.list.matched().len(),
                self.list.documents().len()
            ),
        }
    }

    fn compute_entries(&self) -> Vec<EntryItem> {
        let query = self.prompt.query();
        let text_lines = self
            .list
            .entry_height()
            .saturating_sub(self.list.settings().entry_padding)
            .max(1);
        let matcher = self.list.matcher();

        self.list
            .displayed()
            .iter()
            .filter_map(|&i| self.list.label(i))
            .map(|label| {
                let lines: Vec<String> = label.lines.iter().take(text_lines).cloned().collect();
                let highlight_ranges = lines
                    .iter()
                    .map(|line| matcher.highlight_ranges(line, query))
                    .collect();
                EntryItem {
                    lines,
                    background: label
                        .background
                        .clone()
                        .unwrap_or_else(|| self.list.settings().palette[0].clone()),
                    is_selected: label.state == LabelState::Active,
                    highlight_ranges,
                }
            })
            .collect()
    }

    fn compute_empty_state(&self) -> Option<EmptyState> {
        if !self.library_loaded {
            return Some(EmptyState {
                message: "Loading library…".to_string(),
                subtitle: crate::infrastructure::strip_host_prefix(&self.library_dir),
            });
        }
        if self.list.documents().is_empty() {
            return Some(EmptyState {
                message: "No documents found".to_string(),
                subtitle: format!(
                    "no info.yaml under {}",
                    crate::infrastructure::strip_host_prefix(&self.library_dir)
                ),
            });
        }
        if self.list.matched().is_empty() {
            return Some(EmptyState {
                message: "No documents match".to_string(),
                subtitle: format!("query: {}", self.prompt.query()),
            });
        }
        None
    }

    fn compute_prompt(&self) -> PromptInfo {
        let mut lines: Vec<String> = self.prompt.text().lines().map(str::to_string).collect();
        if lines.len() < self.prompt.height() {
            lines.resize(self.prompt.height(), String::new());
        }
        PromptInfo {
            lines,
            command_mode: self.mode.is(Mode::Command) && self.focus == Focus::Prompt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::keymap::KeyCode;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn document(title: &str, author: &str, files: &[&str]) -> Document {
        let mut info = BTreeMap::new();
        info.insert("title".to_string(), json!(title));
        info.insert("author".to_string(), json!(author));
        info.insert("year".to_string(), json!(1984));
        if !files.is_empty() {
            info.insert("files".to_string(), json!(files));
        }
        Document::new(format!("/host/papers/{title}"), info)
    }

    fn state_with(n: usize, rows: usize) -> AppState {
        let mut state = AppState::new(&Config::default(), Theme::default());
        let docs = (0..n)
            .map(|i| document(&format!("paper{i}"), &format!("author{i}"), &["main.pdf"]))
            .collect();
        state.set_library(docs);
        state.layout(rows, 80);
        state
    }

    fn press(state: &mut AppState, keys: &str) -> Vec<Action> {
        keys.chars().flat_map(|c| state.handle_key(KeyChord::char(c))).collect()
    }

    fn selected_title(state: &AppState) -> String {
        state.list.selected_document().map(|d| d.get("title")).unwrap_or_default()
    }

    #[test]
    fn colon_enters_command_mode_and_typing_filters() {
        let mut state = state_with(12, 40);
        press(&mut state, ":");
        assert_eq!(state.mode.get(), Mode::Command);
        assert_eq!(state.focus, Focus::Prompt);

        press(&mut state, "paper1");
        assert_eq!(state.prompt.text(), "paper1");
        assert_eq!(state.list.matched(), &[1, 10, 11]);
        assert_eq!(selected_title(&state), "paper1");
    }

    #[test]
    fn normal_keys_are_text_in_command_mode() {
        let mut state = state_with(5, 40);
        press(&mut state, ":jk");
        assert_eq!(state.prompt.text(), "jk");
        assert_eq!(state.list.selection(), 0);
    }

    #[test]
    fn return_leaves_command_mode_without_opening() {
        let mut state = state_with(5, 40);
        press(&mut state, ":paper3");
        let actions = state.handle_key(KeyChord::new(KeyCode::Enter));
        assert!(actions.is_empty());
        assert_eq!(state.mode.get(), Mode::Normal);
        assert_eq!(state.list.matched(), &[3]);

        let actions = state.handle_key(KeyChord::new(KeyCode::Enter));
        assert_eq!(
            actions,
            vec![Action::OpenFiles {
                command: "xdg-open".to_string(),
                paths: vec![PathBuf::from("/host/papers/paper3/main.pdf")],
            }]
        );
    }

    #[test]
    fn escape_clears_prompt_and_returns_to_normal() {
        let mut state = state_with(5, 40);
        press(&mut state, ":abc");
        state.handle_key(KeyChord::new(KeyCode::Esc));
        assert_eq!(state.mode.get(), Mode::Normal);
        assert_eq!(state.focus, Focus::List);
        assert_eq!(state.prompt.text(), "");
    }

    #[test]
    fn control_n_and_p_move_while_typing() {
        let mut state = state_with(5, 40);
        press(&mut state, ":");
        state.handle_key(KeyChord::ctrl('n'));
        state.handle_key(KeyChord::ctrl('n'));
        state.handle_key(KeyChord::ctrl('p'));
        assert_eq!(state.list.selection(), 1);
        assert_eq!(state.prompt.text(), "");
    }

    #[test]
    fn control_u_clears_and_refilters() {
        let mut state = state_with(5, 40);
        press(&mut state, ":paper2");
        assert_eq!(state.list.matched().len(), 1);
        state.handle_key(KeyChord::ctrl('u'));
        assert_eq!(state.prompt.text(), "");
        assert_eq!(state.list.matched().len(), 5);
    }

    #[test]
    fn control_c_returns_to_normal_keeping_text() {
        let mut state = state_with(5, 40);
        press(&mut state, ":paper4");
        state.handle_key(KeyChord::ctrl('c'));
        assert_eq!(state.mode.get(), Mode::Normal);
        assert_eq!(state.focus, Focus::List);
        assert_eq!(state.prompt.text(), "paper4");
        assert_eq!(state.list.matched(), &[4]);
    }

    #[test]
    fn control_l_redraws_for_new_viewport() {
        let mut state = state_with(10, 10);
        assert_eq!(state.list.displayed(), &[0, 1, 2]);
        assert!(state.list.set_viewport(20));
        assert_eq!(state.list.displayed(), &[0, 1, 2]);

        state.handle_key(KeyChord::ctrl('l'));
        assert_eq!(state.list.displayed().len(), state.list.capacity());
        assert_eq!(state.list.displayed()[0], 0);

        press(&mut state, ":");
        state.handle_key(KeyChord::ctrl('l'));
        assert_eq!(state.list.displayed().len(), state.list.capacity());
        assert_eq!(state.prompt.text(), "");
    }

    #[test]
    fn navigation_keys_in_normal_mode() {
        let mut state = state_with(10, 40);
        press(&mut state, "jjj");
        assert_eq!(selected_title(&state), "paper3");
        press(&mut state, "k");
        assert_eq!(selected_title(&state), "paper2");
        press(&mut state, "G");
        assert_eq!(selected_title(&state), "paper9");
        press(&mut state, "g");
        assert_eq!(selected_title(&state), "paper0");
    }

    #[test]
    fn scroll_keys_shift_the_window() {
        let mut state = state_with(10, 10);
        assert_eq!(state.list.displayed(), &[0, 1, 2]);
        state.handle_key(KeyChord::ctrl('e'));
        assert_eq!(state.list.displayed(), &[1, 2, 3]);
        assert_eq!(selected_title(&state), "paper1");
        state.handle_key(KeyChord::ctrl('y'));
        assert_eq!(state.list.displayed(), &[0, 1, 2]);
    }

    #[test]
    fn edit_blocks_until_editor_exits() {
        let mut state = state_with(3, 40);
        press(&mut state, "j");
        let actions = press(&mut state, "e");
        assert_eq!(
            actions,
            vec![Action::EditInfo {
                index: 1,
                editor: "vi".to_string(),
                path: PathBuf::from("/host/papers/paper1/info.yaml"),
            }]
        );
        assert!(state.is_blocked());

        let actions = state.finish_edit(Some(0));
        assert!(!state.is_blocked());
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::ReloadDocument { index: 1, folder, .. })]
                if folder == "/host/papers/paper1"
        ));
        assert!(state.finish_edit(Some(0)).is_empty());
    }

    #[test]
    fn actions_without_selection_are_noops() {
        let mut state = state_with(0, 40);
        assert!(press(&mut state, "oei").is_empty());
        assert!(!state.is_blocked());
    }

    #[test]
    fn open_without_files_echoes() {
        let mut state = AppState::new(&Config::default(), Theme::default());
        state.set_library(vec![document("bare", "nobody", &[])]);
        state.layout(40, 80);
        assert!(press(&mut state, "o").is_empty());
        assert_eq!(state.prompt.text(), "No files attached");
    }

    #[test]
    fn help_and_info_are_echoed() {
        let mut state = state_with(2, 40);
        press(&mut state, "h");
        assert!(state.prompt.text().starts_with(":  -  focus_prompt\nj  -  move_down"));
        assert_eq!(state.prompt.height(), state.keymap.table().len());

        press(&mut state, "i");
        assert!(state.prompt.text().contains("title: paper0"));
    }

    #[test]
    fn control_q_exits() {
        let mut state = state_with(1, 40);
        assert_eq!(state.handle_key(KeyChord::ctrl('q')), vec![Action::Close]);
    }

    #[test]
    fn viewmodel_reflects_window_and_selection() {
        let mut state = state_with(10, 10);
        press(&mut state, "j");
        let vm = state.compute_viewmodel();

        assert_eq!(vm.header.mode, "NORMAL");
        assert_eq!(vm.header.title, " bibshelf (10/10) ");
        assert_eq!(vm.entry_height, 2);
        assert_eq!(vm.entries.len(), 3);
        assert_eq!(vm.entries[0].lines, vec!["paper0", "    author0 (1984)"]);
        let selected: Vec<bool> = vm.entries.iter().map(|e| e.is_selected).collect();
        assert_eq!(selected, vec![false, true, false]);
        assert_ne!(vm.entries[0].background, vm.entries[1].background);
        assert!(vm.empty_state.is_none());
        assert_eq!(vm.prompt.lines, vec![String::new()]);
    }

    #[test]
    fn viewmodel_empty_states() {
        let state = AppState::new(&Config::default(), Theme::default());
        let vm = state.compute_viewmodel();
        assert_eq!(vm.empty_state.map(|e| e.message).as_deref(), Some("Loading library…"));

        let mut state = state_with(3, 40);
        press(&mut state, ":zzz");
        let vm = state.compute_viewmodel();
        assert!(vm.prompt.command_mode);
        assert_eq!(vm.empty_state.map(|e| e.subtitle).as_deref(), Some("query: zzz"));
    }

    #[test]
    fn echo_shrinks_the_list() {
        let mut state = state_with(10, 12);
        assert_eq!(state.list.capacity(), 4);
        press(&mut state, "h");
        state.layout(12, 80);
        assert_eq!(state.list.capacity(), 1);
    }
}

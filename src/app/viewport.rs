//! Virtualized document list.
//!
//! [`DocumentList`] owns the loaded documents, one [`Label`] per document, the
//! indices matching the current query and a window over those matches. Only
//! the window `[first_visible, last_visible)` is ever displayed; the UI layer
//! reads the displayed labels back through [`DocumentList::displayed`].
//!
//! After every mutation the window satisfies
//!
//! ```text
//! 0 <= first_visible <= selection < last_visible <= matched.len()
//! ```
//!
//! whenever at least one document matches. With no matches every navigation
//! operation is a no-op.

use crate::app::prompt::Prompt;
use crate::domain::{format_document, Document, DocumentMatcher, MatchMode, Matcher};

/// Direction of a move or scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
}

/// Visual state of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelState {
    #[default]
    Normal,
    Active,
}

/// Persistent visual entry for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Header text, one element per line.
    pub lines: Vec<String>,
    /// Background assigned at the last render.
    pub background: Option<String>,
    pub state: LabelState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenderState {
    Idle,
    Rendering,
}

/// Presentation settings for the list.
#[derive(Debug, Clone)]
pub struct ListSettings {
    /// Template for the label text.
    pub header_format: String,
    /// Template queries are matched against.
    pub match_format: String,
    pub match_mode: MatchMode,
    /// Blank lines below each label.
    pub entry_padding: usize,
    /// Alternating entry backgrounds.
    pub palette: [String; 2],
}

/// Filtered, windowed view over the document library.
#[derive(Debug, Clone)]
pub struct DocumentList {
    documents: Vec<Document>,
    labels: Vec<Label>,
    matched: Vec<usize>,
    first_visible: usize,
    last_visible: usize,
    selection: usize,
    selected: Option<usize>,
    displayed: Vec<usize>,
    render_state: RenderState,
    viewport_rows: usize,
    settings: ListSettings,
    matcher: Matcher,
}

impl DocumentList {
    /// Creates an empty list.
    #[must_use]
    pub fn new(settings: ListSettings) -> Self {
        Self {
            documents: vec![],
            labels: vec![],
            matched: vec![],
            first_visible: 0,
            last_visible: 0,
            selection: 0,
            selected: None,
            displayed: vec![],
            render_state: RenderState::Idle,
            viewport_rows: 0,
            matcher: Matcher::new(settings.match_mode),
            settings,
        }
    }

    /// Replaces the library, creating one label per document.
    ///
    /// Matches, window and selection are reset; call
    /// [`recompute_matches`](Self::recompute_matches) with `force` afterwards.
    pub fn set_documents(&mut self, documents: Vec<Document>) {
        self.labels = documents
            .iter()
            .map(|doc| Label {
                lines: self.header_lines(doc),
                background: None,
                state: LabelState::Normal,
            })
            .collect();
        self.documents = documents;
        self.matched.clear();
        self.displayed.clear();
        self.first_visible = 0;
        self.last_visible = 0;
        self.selection = 0;
        self.selected = None;
        tracing::debug!(documents = self.documents.len(), "labels created");
    }

    /// Swaps in a reloaded document, refreshing its label text in place.
    pub fn replace_document(&mut self, index: usize, document: Document) {
        let lines = self.header_lines(&document);
        match (self.documents.get_mut(index), self.labels.get_mut(index)) {
            (Some(slot), Some(label)) => {
                *slot = document;
                label.lines = lines;
            }
            _ => tracing::warn!(index, "reloaded document is out of range"),
        }
    }

    fn header_lines(&self, document: &Document) -> Vec<String> {
        format_document(&self.settings.header_format, document)
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Updates the rows available for entries. Returns `true` if it changed.
    pub fn set_viewport(&mut self, rows: usize) -> bool {
        let changed = self.viewport_rows != rows;
        self.viewport_rows = rows;
        changed
    }

    /// Indices of the documents matching the prompt's query.
    ///
    /// Unless `force` is set the cached set is returned untouched when the
    /// query has not changed since the previous read. A refilter moves the
    /// window and the selection back to the first match.
    pub fn recompute_matches(&mut self, prompt: &mut Prompt, force: bool) -> &[usize] {
        if !prompt.changed() && !force {
            return &self.matched;
        }
        let query = prompt.command().to_string();
        let _span = tracing::debug_span!("recompute_matches", query = %query, force).entered();

        let format = &self.settings.match_format;
        self.matched = self
            .documents
            .iter()
            .enumerate()
            .filter(|(_, doc)| self.matcher.matches(doc, &query, format))
            .map(|(i, _)| i)
            .collect();
        self.first_visible = 0;
        self.selection = 0;

        tracing::debug!(matched = self.matched.len(), "matches recomputed");
        &self.matched
    }

    /// Moves the selection by one, scrolling when it leaves the window.
    pub fn step(&mut self, direction: Direction) {
        if self.matched.is_empty() {
            return;
        }
        match direction {
            Direction::Down if self.selection + 1 < self.matched.len() => self.selection += 1,
            Direction::Up if self.selection > 0 => self.selection -= 1,
            _ => {}
        }
        if self.selection >= self.last_visible {
            self.scroll(Direction::Down);
        }
        if self.selection < self.first_visible {
            self.scroll(Direction::Up);
        }
        tracing::trace!(
            selection = self.selection,
            first = self.first_visible,
            last = self.last_visible,
            "selection moved"
        );
        self.resolve_selection();
    }

    /// Shifts the window by one entry and re-renders it.
    ///
    /// `first_visible` never goes below zero nor past the last match.
    pub fn scroll(&mut self, direction: Direction) {
        if self.matched.is_empty() {
            return;
        }
        self.undraw();
        self.first_visible = match direction {
            Direction::Down => (self.first_visible + 1).min(self.matched.len() - 1),
            Direction::Up => self.first_visible.saturating_sub(1),
        };
        self.update_window();
        self.clamp_selection();
        self.render();
    }

    /// Selects the first match and shows the window from the top.
    pub fn move_to_top(&mut self) {
        self.first_visible = 0;
        self.selection = 0;
        self.redraw();
    }

    /// Selects the last match and starts the window on it.
    pub fn move_to_bottom(&mut self) {
        let Some(last) = self.matched.len().checked_sub(1) else {
            return;
        };
        self.first_visible = last;
        self.selection = last;
        self.redraw();
    }

    /// Clears the displayed entries unless a render is in progress.
    pub fn undraw(&mut self) {
        if self.render_state == RenderState::Rendering {
            return;
        }
        self.displayed.clear();
    }

    /// Undraws and renders.
    pub fn redraw(&mut self) {
        self.undraw();
        self.render();
    }

    /// Displays the matches inside the window.
    ///
    /// Returns immediately if a render is already running. Each displayed
    /// entry gets `palette[i % 2]`, `i` being its position in the matched set.
    pub fn render(&mut self) {
        if self.render_state == RenderState::Rendering {
            tracing::debug!("render already in progress, dropping request");
            return;
        }
        self.render_state = RenderState::Rendering;

        self.displayed.clear();
        self.update_window();
        for i in self.first_visible..self.last_visible {
            let Some(&doc) = self.matched.get(i) else {
                break;
            };
            if let Some(label) = self.labels.get_mut(doc) {
                label.background = Some(self.settings.palette[i % 2].clone());
            }
            self.displayed.push(doc);
        }

        self.render_state = RenderState::Idle;
        self.resolve_selection();
    }

    /// Clamps the selection into the window and marks its label active.
    pub fn resolve_selection(&mut self) {
        if self.matched.is_empty() {
            return;
        }
        self.clamp_selection();

        if let Some(label) = self.selected.and_then(|prev| self.labels.get_mut(prev)) {
            label.state = LabelState::Normal;
        }
        let doc = self.matched[self.selection];
        if let Some(label) = self.labels.get_mut(doc) {
            label.state = LabelState::Active;
        }
        self.selected = Some(doc);
    }

    fn clamp_selection(&mut self) {
        if self.selection < self.first_visible {
            self.selection = self.first_visible;
        }
        if self.selection >= self.last_visible {
            self.selection = self.last_visible.saturating_sub(1);
        }
        if self.selection >= self.matched.len() {
            self.selection = self.matched.len().saturating_sub(1);
        }
    }

    fn update_window(&mut self) {
        let len = self.matched.len();
        self.first_visible = self.first_visible.min(len.saturating_sub(1));
        self.last_visible = (self.first_visible + self.capacity()).min(len);
    }

    /// Lines taken by one entry.
    #[must_use]
    pub fn entry_height(&self) -> usize {
        self.settings.header_format.lines().count().max(1) + self.settings.entry_padding
    }

    /// Entries that fit in the viewport, at least one.
    #[must_use]
    pub fn capacity(&self) -> usize {
        (self.viewport_rows / self.entry_height()).max(1)
    }

    /// The document currently marked active.
    #[must_use]
    pub fn selected_document(&self) -> Option<&Document> {
        self.selected.and_then(|i| self.documents.get(i))
    }

    /// Library index of the active document.
    #[must_use]
    pub const fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    #[must_use]
    pub fn matched(&self) -> &[usize] {
        &self.matched
    }

    /// Library indices of the displayed entries, top to bottom.
    #[must_use]
    pub fn displayed(&self) -> &[usize] {
        &self.displayed
    }

    #[must_use]
    pub fn label(&self, index: usize) -> Option<&Label> {
        self.labels.get(index)
    }

    #[must_use]
    pub const fn first_visible(&self) -> usize {
        self.first_visible
    }

    #[must_use]
    pub const fn last_visible(&self) -> usize {
        self.last_visible
    }

    #[must_use]
    pub const fn selection(&self) -> usize {
        self.selection
    }

    #[must_use]
    pub const fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    #[must_use]
    pub fn settings(&self) -> &ListSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::keymap::KeyChord;
    use crate::app::modes::{Mode, ModeHandle};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn settings() -> ListSettings {
        ListSettings {
            header_format: "{doc[title]}".to_string(),
            match_format: "{doc[title]}".to_string(),
            match_mode: MatchMode::Regex,
            entry_padding: 0,
            palette: ["#111111".to_string(), "#222222".to_string()],
        }
    }

    fn documents(n: usize) -> Vec<Document> {
        (0..n)
            .map(|i| {
                let mut info = BTreeMap::new();
                info.insert("title".to_string(), json!(format!("D{i}")));
                Document::new(format!("/host/lib/d{i}"), info)
            })
            .collect()
    }

    /// List with `n` documents, all matching, `rows` rows of viewport.
    fn loaded(n: usize, rows: usize) -> (ModeHandle, Prompt, DocumentList) {
        let mode = ModeHandle::new(Mode::Command);
        let mut prompt = Prompt::new(mode.clone());
        let mut list = DocumentList::new(settings());
        list.set_documents(documents(n));
        list.set_viewport(rows);
        list.recompute_matches(&mut prompt, true);
        list.render();
        (mode, prompt, list)
    }

    fn assert_window(list: &DocumentList) {
        let len = list.matched().len();
        assert!(list.first_visible() <= list.selection(), "first <= selection");
        assert!(list.selection() < list.last_visible(), "selection < last");
        assert!(list.last_visible() <= len, "last <= len");
        assert!(list.selection() < len);
    }

    #[test]
    fn unchanged_query_returns_cached_matches() {
        let (_mode, mut prompt, mut list) = loaded(10, 5);
        let first = list.recompute_matches(&mut prompt, false).as_ptr();
        let second = list.recompute_matches(&mut prompt, false).as_ptr();
        assert_eq!(first, second);
        assert_eq!(list.matched().len(), 10);
    }

    #[test]
    fn changed_query_refilters_in_library_order() {
        let (_mode, mut prompt, mut list) = loaded(12, 5);
        for c in "D1".chars() {
            prompt.edit(&KeyChord::char(c));
        }
        assert_eq!(list.recompute_matches(&mut prompt, false), &[1, 10, 11]);
    }

    #[test]
    fn refilter_starts_from_the_first_match() {
        let (_mode, mut prompt, mut list) = loaded(20, 3);
        list.move_to_bottom();
        assert_eq!(list.displayed(), &[19]);

        for c in "D1".chars() {
            prompt.edit(&KeyChord::char(c));
        }
        list.recompute_matches(&mut prompt, false);
        list.render();
        assert_eq!(list.displayed(), &[1, 10, 11]);
        assert_eq!(list.selection(), 0);
        assert_eq!(list.selected_index(), Some(1));
        assert_window(&list);

        list.move_to_bottom();
        list.recompute_matches(&mut prompt, false);
        list.render();
        assert_eq!(list.selection(), 10);
    }

    #[test]
    fn window_invariant_holds_while_navigating() {
        let (_mode, _prompt, mut list) = loaded(10, 3);
        assert_eq!((list.first_visible(), list.last_visible()), (0, 3));

        for _ in 0..12 {
            list.step(Direction::Down);
            assert_window(&list);
        }
        for _ in 0..4 {
            list.scroll(Direction::Up);
            assert_window(&list);
        }
        for _ in 0..12 {
            list.step(Direction::Up);
            assert_window(&list);
        }
        for _ in 0..20 {
            list.scroll(Direction::Down);
            assert_window(&list);
        }
        assert_eq!(list.first_visible(), 9);
    }

    #[test]
    fn top_and_bottom_select_the_ends() {
        let (_mode, _prompt, mut list) = loaded(10, 4);
        list.move_to_bottom();
        assert_eq!(list.selection(), 9);
        assert_window(&list);

        list.move_to_top();
        assert_eq!(list.selection(), 0);
        assert_eq!(list.displayed(), &[0, 1, 2, 3]);
        assert_window(&list);
    }

    #[test]
    fn moving_past_the_end_stays_on_last() {
        let (_mode, _prompt, mut list) = loaded(10, 4);
        list.move_to_bottom();
        list.step(Direction::Down);
        assert_eq!(list.selection(), 9);
        assert_eq!(list.selected_index(), Some(9));
    }

    #[test]
    fn empty_matches_make_navigation_a_noop() {
        let (_mode, mut prompt, mut list) = loaded(4, 4);
        list.step(Direction::Down);
        assert_eq!(list.selected_index(), Some(1));

        for c in "nothing".chars() {
            prompt.edit(&KeyChord::char(c));
        }
        assert!(list.recompute_matches(&mut prompt, false).is_empty());
        list.render();

        list.step(Direction::Down);
        list.scroll(Direction::Down);
        list.move_to_bottom();
        list.resolve_selection();
        assert!(list.displayed().is_empty());
        assert_eq!(list.selected_index(), Some(1));
    }

    #[test]
    fn reentrant_render_is_dropped() {
        let (_mode, _prompt, mut list) = loaded(6, 2);
        let before = list.displayed().to_vec();

        list.render_state = RenderState::Rendering;
        list.first_visible = 3;
        list.render();
        list.undraw();

        assert_eq!(list.displayed(), before.as_slice());
        assert_eq!(list.first_visible(), 3);
    }

    #[test]
    fn palette_alternates_by_matched_position() {
        let (_mode, _prompt, mut list) = loaded(6, 10);
        list.scroll(Direction::Down);
        assert_eq!(list.displayed(), &[1, 2, 3, 4, 5]);
        let bg = |i: usize| list.label(i).and_then(|l| l.background.clone());
        assert_eq!(bg(1).as_deref(), Some("#222222"));
        assert_eq!(bg(2).as_deref(), Some("#111111"));
    }

    #[test]
    fn only_one_label_is_active() {
        let (_mode, _prompt, mut list) = loaded(5, 5);
        list.step(Direction::Down);
        list.step(Direction::Down);
        let active: Vec<usize> = (0..5)
            .filter(|&i| list.label(i).is_some_and(|l| l.state == LabelState::Active))
            .collect();
        assert_eq!(active, vec![2]);
    }

    #[test]
    fn capacity_accounts_for_entry_height() {
        let mut s = settings();
        s.header_format = "{doc[title]}\n  {doc[author]}".to_string();
        s.entry_padding = 1;
        let mut list = DocumentList::new(s);
        list.set_viewport(10);
        assert_eq!(list.entry_height(), 3);
        assert_eq!(list.capacity(), 3);
        list.set_viewport(1);
        assert_eq!(list.capacity(), 1);
    }

    #[test]
    fn replacing_a_document_refreshes_its_label() {
        let (_mode, _prompt, mut list) = loaded(3, 3);
        let mut info = BTreeMap::new();
        info.insert("title".to_string(), json!("Revised"));
        list.replace_document(1, Document::new("/host/lib/d1", info));
        assert_eq!(list.label(1).map(|l| l.lines.clone()), Some(vec!["Revised".to_string()]));
        list.replace_document(7, Document::new("/host/lib/x", BTreeMap::new()));
        assert_eq!(list.documents().len(), 3);
    }
}

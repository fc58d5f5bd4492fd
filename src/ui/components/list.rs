//! Document entry list renderer.
//!
//! Each entry occupies `entry_height` rows: its label lines followed by
//! padding rows, all on the entry's background. The active entry uses the
//! selection colours instead.

use crate::ui::helpers::{self, fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{EntryItem, UIViewModel};

/// Renders the displayed entries into `rows` rows starting at `row`.
///
/// Returns the row after the last one drawn.
pub fn render_entries(row: usize, rows: usize, vm: &UIViewModel, theme: &Theme, cols: usize) -> usize {
    let end = row + rows;
    let mut current_row = row;
    for entry in &vm.entries {
        if current_row + vm.entry_height > end {
            break;
        }
        current_row = render_entry(current_row, entry, vm.entry_height, theme, cols);
    }
    current_row
}

fn render_entry(row: usize, entry: &EntryItem, height: usize, theme: &Theme, cols: usize) -> usize {
    let (fg, bg) = if entry.is_selected {
        (&theme.colors.selection_fg, &theme.colors.selection_bg)
    } else {
        (&theme.colors.text_normal, &entry.background)
    };

    for offset in 0..height {
        position_cursor(row + offset, 1);
        let line_fg = if offset == 0 || entry.is_selected { fg } else { &theme.colors.text_dim };
        let restore = format!("{}{}", Theme::fg(line_fg), Theme::bg(bg));
        print!("{restore}");

        let text = entry.lines.get(offset).map_or_else(String::new, |l| fit(l, cols));
        let ranges = entry.highlight_ranges.get(offset).map_or(&[][..], Vec::as_slice);
        helpers::render_highlighted_text(&text, ranges, theme, &restore, entry.is_selected);

        print!("{}", " ".repeat(cols.saturating_sub(text.chars().count())));
        print!("{}", Theme::reset());
    }
    row + height
}

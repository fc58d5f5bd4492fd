//! Composable UI component renderers.
//!
//! # Components
//!
//! - [`header`]: Mode indicator and title bar
//! - [`list`]: Document entries with alternating backgrounds
//! - [`prompt`]: Command prompt and echoed messages
//! - [`empty`]: Message shown when no entry is displayed
//!
//! # Layout
//!
//! ```text
//! [Header]
//! [Border]
//! [Entries / empty state, filling the free rows]
//! [Border]
//! [Prompt, one row per prompt line]
//! ```

mod empty;
mod header;
mod list;
mod prompt;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

use empty::render_empty_state;
use header::render_header;
use list::render_entries;
use prompt::render_prompt;

/// Rows used by the header and the two borders.
pub const CHROME_ROWS: usize = 3;

/// Renders a horizontal border line, returning the next row.
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the full layout.
pub fn render_layout(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let prompt_rows = vm.prompt.lines.len().max(1);
    let list_rows = rows.saturating_sub(CHROME_ROWS + prompt_rows);

    let mut current_row = 1;
    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);

    match &vm.empty_state {
        Some(empty) => render_empty_state(current_row, list_rows, empty, theme, cols),
        None => {
            render_entries(current_row, list_rows, vm, theme, cols);
        }
    }

    current_row += list_rows;
    current_row = render_border(current_row, &theme.colors.border, cols);
    render_prompt(current_row, &vm.prompt, theme, cols);
}

//! Empty state component renderer.

use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;

/// Renders the two-line message centered in the `rows` rows starting at
/// `row`.
pub fn render_empty_state(row: usize, rows: usize, empty: &EmptyState, theme: &Theme, cols: usize) {
    if rows == 0 {
        return;
    }
    let message_row = row + rows.saturating_sub(2) / 2;

    let message = fit(&empty.message, cols);
    let msg_len = message.chars().count();
    let msg_padding = (cols.saturating_sub(msg_len)) / 2;

    position_cursor(message_row, 1);
    print!("{}", Theme::fg(&theme.colors.empty_state_fg));
    print!("{}", " ".repeat(msg_padding));
    print!("{message}");
    print!("{}", Theme::reset());

    if rows < 2 {
        return;
    }

    let subtitle = fit(&empty.subtitle, cols);
    let sub_len = subtitle.chars().count();
    let sub_padding = (cols.saturating_sub(sub_len)) / 2;

    position_cursor(message_row + 1, 1);
    print!("{}", Theme::dim());
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}", " ".repeat(sub_padding));
    print!("{subtitle}");
    print!("{}", Theme::reset());
}

//! Header component renderer.

use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the mode indicator on the left and the centered title, returning
/// the next row.
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let mode = format!(" {} ", header.mode);
    let mode_len = mode.chars().count().min(cols);
    let title = fit(&header.title, cols.saturating_sub(mode_len));
    let title_len = title.chars().count();
    let padding = (cols.saturating_sub(title_len)) / 2;
    let left_gap = padding.saturating_sub(mode_len);

    position_cursor(row, 1);
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.mode_fg));
    print!("{}", fit(&mode, cols));

    print!("{}", Theme::fg(&theme.colors.header_fg));
    print!("{}", " ".repeat(left_gap));
    print!("{title}");
    print!("{}", " ".repeat(cols.saturating_sub(mode_len + left_gap + title_len)));

    print!("{}", Theme::reset());
    row + 1
}

//! Command prompt renderer.

use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::PromptInfo;

/// Renders the prompt lines starting at `row`, returning the next row.
///
/// In command mode the first line carries a `:` marker and the last line a
/// block cursor.
pub fn render_prompt(row: usize, prompt: &PromptInfo, theme: &Theme, cols: usize) -> usize {
    let last = prompt.lines.len().saturating_sub(1);
    for (i, line) in prompt.lines.iter().enumerate() {
        let mut text = String::new();
        if prompt.command_mode && i == 0 {
            text.push(':');
        }
        text.push_str(line);
        if prompt.command_mode && i == last {
            text.push('█');
        }
        let text = fit(&text, cols);

        position_cursor(row + i, 1);
        print!("{}", Theme::fg(&theme.colors.prompt_fg));
        print!("{}", Theme::bg(&theme.colors.prompt_bg));
        print!("{text}");
        print!("{}", " ".repeat(cols.saturating_sub(text.chars().count())));
        print!("{}", Theme::reset());
    }
    row + prompt.lines.len()
}

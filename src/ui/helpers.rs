//! Shared rendering utilities.
//!
//! Highlight ranges and truncation work on character indices, not bytes, so
//! multi-byte titles render correctly.

use crate::ui::theme::Theme;

/// Positions the cursor at a 1-indexed `row` and `col`.
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Truncates `text` to `width` characters, marking the cut with `…`.
///
/// ```rust
/// use bibshelf::ui::helpers::fit;
///
/// assert_eq!(fit("Structure and Interpretation", 12), "Structure a…");
/// assert_eq!(fit("SICP", 12), "SICP");
/// ```
#[must_use]
pub fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    if width > 0 {
        out.push('…');
    }
    out
}

/// Splits `text` into `(section, highlighted)` runs.
///
/// Ranges are `(start, end)` character indices with an exclusive end, sorted
/// and non-overlapping; parts beyond the text are ignored.
#[must_use]
pub fn highlight_sections(text: &str, ranges: &[(usize, usize)]) -> Vec<(String, bool)> {
    let chars: Vec<char> = text.chars().collect();
    let mut sections = Vec::new();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len()).max(current_pos);
        let end = end.min(chars.len());
        if start > current_pos {
            sections.push((chars[current_pos..start].iter().collect(), false));
        }
        if end > start {
            sections.push((chars[start..end].iter().collect(), true));
            current_pos = end;
        } else {
            current_pos = start;
        }
    }

    if current_pos < chars.len() {
        sections.push((chars[current_pos..].iter().collect(), false));
    }
    sections
}

/// Prints `text` with `ranges` highlighted.
///
/// After each highlighted run the colours in `restore` are re-applied, so the
/// entry keeps its own background. Active entries are printed without
/// highlighting.
pub fn render_highlighted_text(
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    restore: &str,
    is_selected: bool,
) {
    if ranges.is_empty() || is_selected {
        print!("{text}");
        return;
    }

    for (section, highlighted) in highlight_sections(text, ranges) {
        if highlighted {
            print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
            print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
            print!("{section}");
            print!("{}", Theme::reset());
            print!("{restore}");
        } else {
            print!("{section}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_cover_the_whole_text() {
        let sections = highlight_sections("okasaki", &[(0, 2), (4, 5)]);
        assert_eq!(
            sections,
            vec![
                ("ok".to_string(), true),
                ("as".to_string(), false),
                ("a".to_string(), true),
                ("ki".to_string(), false),
            ]
        );
    }

    #[test]
    fn ranges_past_the_end_are_clipped() {
        let sections = highlight_sections("año", &[(1, 10)]);
        assert_eq!(sections, vec![("a".to_string(), false), ("ño".to_string(), true)]);
        assert_eq!(highlight_sections("", &[(0, 3)]), vec![]);
    }

    #[test]
    fn fit_counts_characters() {
        assert_eq!(fit("Gödel, Escher, Bach", 6), "Gödel…");
        assert_eq!(fit("abc", 0), "");
    }
}

//! Top-level rendering coordinator.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → components → ANSI on stdout
//! ```

use crate::app::AppState;
use crate::ui::components;

/// Renders the plugin UI to stdout.
///
/// The state must already be laid out for `rows` x `cols` (see
/// `AppState::layout`), otherwise the displayed window may not fit.
pub fn render(state: &AppState, rows: usize, cols: usize) {
    let viewmodel = state.compute_viewmodel();
    components::render_layout(&viewmodel, &state.theme, cols, rows);
}

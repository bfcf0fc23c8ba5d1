//! Text rendering of display states and plots.

use crate::calculator::{DisplayState, group_digits};
use crate::plot::Plot;

/// Rows printed for a plot table.
const PLOT_ROWS: usize = 11;

/// Render a display state as a few lines of plain text.
///
/// ```text
/// DEG | 7 +
/// = 14
/// ```
pub fn render_display(state: &DisplayState, grouped: bool) -> Vec<String> {
    let mut lines = Vec::new();

    let header = match (&state.indicator, &state.pending) {
        (Some(indicator), Some(pending)) => format!("{} | {}", indicator, pending),
        (Some(indicator), None) => indicator.clone(),
        (None, Some(pending)) => pending.clone(),
        (None, None) => String::new(),
    };
    if !header.is_empty() {
        lines.push(header);
    }

    let text = if grouped {
        group_digits(&state.text)
    } else {
        state.text.clone()
    };
    lines.push(format!("= {}", text));

    if let Some(bits) = &state.bits {
        lines.push(format!("bits {}", bits));
    }
    if let Some(error) = &state.error {
        lines.push(format!("error: {}", error));
    }
    lines
}

/// Render a plot as a title, a summary line and a coarse table of samples.
pub fn render_plot(plot: &Plot) -> Vec<String> {
    let mut lines = vec![plot.title()];

    let (Some(&(xmin, _)), Some(&(xmax, _))) = (plot.points.first(), plot.points.last()) else {
        return lines;
    };
    let (ymin, ymax) = plot.y_range().unwrap_or((0.0, 0.0));
    lines.push(format!(
        "{} samples, x in [{}, {}], y in [{:.6}, {:.6}]",
        plot.points.len(),
        xmin,
        xmax,
        ymin,
        ymax
    ));

    let last = plot.points.len() - 1;
    let rows = PLOT_ROWS.min(plot.points.len());
    for row in 0..rows {
        let index = if rows == 1 { 0 } else { row * last / (rows - 1) };
        let (x, y) = plot.points[index];
        lines.push(format!("{:>12.4}  {:>14.6}", x, y));
    }
    lines
}

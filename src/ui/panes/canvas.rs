//! Canvas pane rendering
//!
//! Each cell is drawn two columns wide so the grid looks square in most
//! terminal fonts. Transparent cells show a faint dot pattern. The brush cell
//! is marked with a diamond when it lies inside the canvas.
//!
//! Canvases larger than the pane are cropped around the brush.

use crate::canvas::brush::Brush;
use crate::canvas::{Canvas, ColorName};
use crate::ui::theme::{cell_color, DEFAULT_THEME};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const CELL_WIDTH: usize = 2;

/// Render the canvas pane
pub fn render_canvas_pane(frame: &mut Frame, area: Rect, canvas: &Canvas, brush: &Brush) {
    let title = format!(
        " Canvas {0}x{0} │ brush ({1}, {2}) {3} size {4} ",
        canvas.size(),
        brush.x,
        brush.y,
        brush.color,
        brush.size
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));

    let visible_cols = (area.width.saturating_sub(2) as usize / CELL_WIDTH).max(1);
    let visible_rows = area.height.saturating_sub(2).max(1) as usize;
    let first_col = window_start(brush.x, visible_cols, canvas.size());
    let first_row = window_start(brush.y, visible_rows, canvas.size());

    let lines: Vec<Line> = canvas
        .rows()
        .enumerate()
        .skip(first_row)
        .take(visible_rows)
        .map(|(y, row)| {
            let spans: Vec<Span> = row
                .iter()
                .enumerate()
                .skip(first_col)
                .take(visible_cols)
                .map(|(x, cell)| {
                    let is_brush = brush.x >= 0
                        && brush.y >= 0
                        && x == brush.x as usize
                        && y == brush.y as usize;
                    cell_span(*cell, is_brush)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn cell_span(cell: ColorName, is_brush: bool) -> Span<'static> {
    let base = match cell_color(cell) {
        Some(color) => Style::default().bg(color),
        None => Style::default().fg(DEFAULT_THEME.comment),
    };

    if is_brush {
        let marker = if matches!(cell, ColorName::Black | ColorName::Blue | ColorName::Purple) {
            Color::White
        } else {
            Color::Black
        };
        return Span::styled("◆ ", base.fg(marker).add_modifier(Modifier::BOLD));
    }

    match cell {
        ColorName::Transparent => Span::styled("··", base),
        _ => Span::styled("  ", base),
    }
}

/// First visible index of a window of `visible` cells that keeps `focus` in view
fn window_start(focus: i32, visible: usize, size: usize) -> usize {
    if size <= visible {
        return 0;
    }
    let focus = usize::try_from(focus).unwrap_or(0).min(size - 1);
    focus
        .saturating_sub(visible / 2)
        .min(size - visible)
}

//! Diagnostics pane rendering

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

fn line_style(line: &str) -> Style {
    if line.starts_with("[Error]") {
        Style::default().fg(DEFAULT_THEME.error)
    } else if line.starts_with("[Warning]") {
        Style::default().fg(DEFAULT_THEME.warning)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    }
}

/// Render the compile and runtime diagnostics of the run
pub fn render_diagnostics_pane(
    frame: &mut Frame,
    area: Rect,
    diagnostics: &[String],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Diagnostics ")
        .borders(Borders::ALL)
        .border_style(border_style);

    if diagnostics.is_empty() {
        let paragraph = Paragraph::new("(no diagnostics)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.success));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if diagnostics.len() > visible_height {
        *scroll_offset = (*scroll_offset).min(diagnostics.len() - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let items: Vec<ListItem> = diagnostics
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|line| ListItem::new(line.as_str()).style(line_style(line)))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

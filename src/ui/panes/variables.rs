//! Variables pane rendering
//!
//! Lists every variable assigned so far at the current history position, sorted
//! by name, with its value and runtime type.

use crate::interpreter::Value;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use std::collections::HashMap;
use std::hash::BuildHasher;

fn value_style(value: &Value) -> Style {
    match value {
        Value::Int(_) => Style::default().fg(DEFAULT_THEME.number),
        Value::Str(_) => Style::default().fg(DEFAULT_THEME.string),
        Value::Bool(_) => Style::default().fg(DEFAULT_THEME.keyword),
    }
}

/// One aligned `name = value  type` line
fn variable_line<'a>(name: &'a str, value: &Value, content_width: usize) -> Line<'a> {
    let value_text = value.to_string();
    let type_text = value.value_type().to_string();
    // "name" + " = " + value + padding + type
    let used = name.len() + 3 + value_text.len() + type_text.len();
    let padding = content_width.saturating_sub(used).max(1);

    Line::from(vec![
        Span::styled(name, Style::default().fg(DEFAULT_THEME.fg)),
        Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(value_text, value_style(value)),
        Span::raw(" ".repeat(padding)),
        Span::styled(type_text, Style::default().fg(DEFAULT_THEME.type_name)),
    ])
}

/// Render the variables pane
pub fn render_variables_pane<S: BuildHasher>(
    frame: &mut Frame,
    area: Rect,
    variables: &HashMap<String, Value, S>,
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
        .title(" Variables ")
        .borders(Borders::ALL)
        .border_style(border_style);

    if variables.is_empty() {
        let paragraph = Paragraph::new("(none)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let mut names: Vec<&String> = variables.keys().collect();
    names.sort();

    let content_width = area.width.saturating_sub(2) as usize;
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if names.len() > visible_height {
        *scroll_offset = (*scroll_offset).min(names.len() - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let items: Vec<ListItem> = names
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .filter_map(|name| {
            variables
                .get(name)
                .map(|value| ListItem::new(variable_line(name, value, content_width)))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

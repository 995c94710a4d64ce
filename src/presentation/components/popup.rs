use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};
use serde_json::Value;

use crate::domain::{OptionSourceSpec, WidgetOptions};
use crate::engine::FormOrchestrator;
use crate::form::field::convert::option_index;

use super::layout::popup_rect;

/// Option list for the focused multi or remote select.
pub fn render_option_popup(frame: &mut Frame<'_>, form: &FormOrchestrator) {
    let (Some(field), Some(name)) = (form.focused_descriptor(), form.focused_name()) else {
        return;
    };
    let (multiple, remote) = match &field.widget_options {
        WidgetOptions::Select { source, multiple } => {
            (*multiple, matches!(source, OptionSourceSpec::Remote(_)))
        }
        _ => return,
    };
    let bound = form.bound(field, &name);
    if bound.options.is_empty() || !(multiple || (remote && !bound.keyword.is_empty())) {
        return;
    }

    let items: Vec<ListItem<'static>> = bound
        .options
        .iter()
        .map(|option| {
            if multiple {
                let checked = match bound.value {
                    Value::Array(items) => items.contains(&option.value),
                    _ => false,
                };
                ListItem::new(format!("[{}] {}", if checked { "x" } else { " " }, option.label))
            } else {
                ListItem::new(option.label.clone())
            }
        })
        .collect();

    let widest = bound
        .options
        .iter()
        .map(|option| option.label.chars().count())
        .max()
        .unwrap_or(10) as u16;
    let width = widest
        .saturating_add(10)
        .min(frame.area().width.saturating_sub(2).max(1));
    let height = (bound.options.len() + 2).min(frame.area().height as usize) as u16;
    let area = popup_rect(frame.area(), width, height.max(3));
    frame.render_widget(Clear, area);

    let selected = if multiple {
        bound.cursor.min(bound.options.len() - 1)
    } else {
        option_index(bound.options, bound.value).unwrap_or(0)
    };
    let mut state = ListState::default();
    state.select(Some(selected));
    let list = List::new(items)
        .block(
            Block::default()
                .title(field.display_label())
                .borders(Borders::ALL),
        )
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut state);
}

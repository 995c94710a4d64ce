use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::domain::FieldDescriptor;
use crate::engine::FormOrchestrator;
use crate::form::{ComponentKind, FieldComponent, GridRow, layout_rows};

use super::super::view::{RenderReport, UiContext};
use super::layout::grid_cells;
use super::tabstrip::{LocaleTab, render_locale_tabs};

const INPUT_HEIGHT: u16 = 3;
const TABS_HEIGHT: u16 = 3;
const ERROR_HEIGHT: u16 = 1;

pub fn render_grid(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>, report: &mut RenderReport) {
    let form = ctx.form;
    let block = Block::default().borders(Borders::ALL).title(ctx.title.to_string());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields = &form.descriptor().fields;
    if fields.is_empty() {
        frame.render_widget(Paragraph::new("This form has no fields"), inner);
        return;
    }

    let rows = layout_rows(form.descriptor(), form.options().columns);
    let heights: Vec<u16> = rows.iter().map(|row| row_height(form, row)).collect();
    let focused_row = rows
        .iter()
        .position(|row| row.cells.iter().any(|cell| cell.field == form.focused_index()))
        .unwrap_or(0);
    let first = first_visible_row(&heights, focused_row, inner.height);

    let mut y = inner.y;
    let bottom = inner.y.saturating_add(inner.height);
    for (row, height) in rows.iter().zip(&heights).skip(first) {
        if y >= bottom {
            break;
        }
        let height = (*height).min(bottom - y);
        let row_area = Rect::new(inner.x, y, inner.width, height);
        let spans: Vec<u16> = row.cells.iter().map(|cell| cell.span).collect();
        let cells = grid_cells(row_area, &spans, form.options().columns);
        for (cell, cell_area) in row.cells.iter().zip(cells) {
            if let Some(field) = fields.get(cell.field) {
                let focused = cell.field == form.focused_index();
                render_cell(frame, cell_area, form, field, focused, ctx.enable_cursor, report);
            }
        }
        y = y.saturating_add(height);
    }
}

/// First row to draw so the focused row stays on screen.
fn first_visible_row(heights: &[u16], focused: usize, available: u16) -> usize {
    let mut start = 0;
    let mut used: u32 = heights.iter().take(focused + 1).map(|h| *h as u32).sum();
    while start < focused && used > available as u32 {
        used -= heights[start] as u32;
        start += 1;
    }
    start
}

fn row_height(form: &FormOrchestrator, row: &GridRow) -> u16 {
    row.cells
        .iter()
        .filter_map(|cell| form.descriptor().fields.get(cell.field))
        .map(|field| cell_height(form, field))
        .max()
        .unwrap_or(INPUT_HEIGHT)
}

fn cell_height(form: &FormOrchestrator, field: &FieldDescriptor) -> u16 {
    let mut height = INPUT_HEIGHT;
    if form.tabs(&field.name).is_some() {
        height += TABS_HEIGHT;
    }
    if form.error(&input_name(form, field)).is_some() {
        height += ERROR_HEIGHT;
    }
    height
}

fn input_name(form: &FormOrchestrator, field: &FieldDescriptor) -> String {
    form.tabs(&field.name)
        .and_then(|tabs| tabs.active_name())
        .unwrap_or_else(|| field.name.clone())
}

fn render_cell(
    frame: &mut Frame<'_>,
    area: Rect,
    form: &FormOrchestrator,
    field: &FieldDescriptor,
    focused: bool,
    enable_cursor: bool,
    report: &mut RenderReport,
) {
    let name = input_name(form, field);
    let error = form.error(&name);

    let mut constraints = Vec::with_capacity(3);
    if form.tabs(&field.name).is_some() {
        constraints.push(Constraint::Length(TABS_HEIGHT));
    }
    constraints.push(Constraint::Length(INPUT_HEIGHT));
    if error.is_some() {
        constraints.push(Constraint::Length(ERROR_HEIGHT));
    }
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut index = 0;
    if let Some(tabs) = form.tabs(&field.name) {
        let completion = form.completion(&field.name);
        let tab_list: Vec<LocaleTab<'_>> = tabs
            .locales()
            .iter()
            .enumerate()
            .map(|(position, locale)| LocaleTab {
                locale,
                filled: completion.get(position).copied().unwrap_or(false),
                invalid: tabs
                    .sub_name(position)
                    .is_some_and(|sub| form.error(&sub).is_some()),
            })
            .collect();
        render_locale_tabs(frame, parts[index], &tab_list, tabs.active(), focused);
        index += 1;
    }

    let mut label = field.display_label();
    if field.validation.required {
        label.push_str(" *");
    }
    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    };
    let border_style = match (error.is_some(), focused) {
        (true, _) => Style::default().fg(Color::Red),
        (false, true) => Style::default().fg(Color::Yellow),
        (false, false) => Style::default().fg(Color::DarkGray),
    };

    let display = form.display(field);
    let value_style = if field.disabled {
        Style::default().fg(Color::DarkGray)
    } else if focused {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let placeholder = field.placeholder.as_deref().filter(|_| display.is_empty());
    let content = match placeholder {
        Some(text) => Span::styled(
            text.to_string(),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ),
        None => Span::styled(display.clone(), value_style),
    };
    let input_area = parts[index];
    let input = Paragraph::new(Line::from(content)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(label, label_style)),
    );
    frame.render_widget(input, input_area);
    report.mounted.push(name.clone());

    if enable_cursor && focused && !field.disabled && takes_cursor(form, field) {
        let inner_width = input_area.width.saturating_sub(2);
        let offset = (UnicodeWidthStr::width(display.as_str()) as u16).min(inner_width.saturating_sub(1));
        frame.set_cursor_position((
            input_area.x.saturating_add(1).saturating_add(offset),
            input_area.y.saturating_add(1),
        ));
    }

    if let Some(message) = error {
        let line = Paragraph::new(Line::from(Span::styled(
            format!("  ⚠ {message}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(line, parts[index + 1]);
    }
}

fn takes_cursor(form: &FormOrchestrator, field: &FieldDescriptor) -> bool {
    form.component(&field.name).is_some_and(edits_text)
}

fn edits_text(component: &dyn FieldComponent) -> bool {
    match component.kind() {
        ComponentKind::TextInput | ComponentKind::Number | ComponentKind::MapPosition => true,
        ComponentKind::MultiLanguage => component.locale_input().is_some_and(edits_text),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focused_row_scrolls_into_view() {
        let heights = [3, 3, 6, 3];
        assert_eq!(first_visible_row(&heights, 0, 5), 0);
        assert_eq!(first_visible_row(&heights, 2, 9), 1);
        assert_eq!(first_visible_row(&heights, 3, 9), 2);
        assert_eq!(first_visible_row(&heights, 3, 2), 3);
    }

    #[test]
    fn locale_tabs_take_the_cursor_of_their_sub_widget() {
        use std::sync::Arc;

        use crate::domain::FieldKind;
        use crate::form::ComponentPalette;
        use crate::form::field::components::{
            MultiLanguageComponent, TextComponent, ToggleComponent,
        };

        let text = MultiLanguageComponent::new(Box::new(TextComponent::new(FieldKind::Text)));
        let toggle = MultiLanguageComponent::new(Box::new(ToggleComponent::new(
            FieldKind::Switch,
            Arc::new(ComponentPalette::default()),
        )));
        assert!(edits_text(&text));
        assert!(!edits_text(&toggle));
    }
}

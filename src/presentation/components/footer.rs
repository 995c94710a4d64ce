use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::super::view::UiContext;

pub fn render_footer(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let form = ctx.form;
    let mut parts = vec![if ctx.status_message.trim().is_empty() {
        "Ready".to_string()
    } else {
        ctx.status_message.to_string()
    }];
    if form.store().values() != form.store().defaults() {
        parts.push("unsaved changes".into());
    }
    if let Some(field) = form.focused_descriptor() {
        let mut focus = format!("focus: {}", field.display_label());
        if let Some(locale) = form.tabs(&field.name).and_then(|tabs| tabs.active_locale()) {
            focus.push_str(&format!(" [{locale}]"));
        }
        parts.push(focus);
    }

    let error_count = form.errors().len();
    let badge = if form.is_busy() {
        Span::styled(
            "[submitting…]",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )
    } else if error_count > 0 {
        Span::styled(
            format!("[! {error_count}]"),
            Style::default().fg(Color::Red).bg(Color::Black),
        )
    } else {
        Span::styled("[ok]", Style::default().fg(Color::Green))
    };

    let mut lines = vec![Line::from(vec![
        badge,
        Span::raw(" "),
        Span::raw(parts.join(" • ")),
    ])];
    if let Some(help) = ctx.help {
        lines.push(Line::from(Span::styled(
            help.to_string(),
            Style::default().fg(Color::Yellow),
        )));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

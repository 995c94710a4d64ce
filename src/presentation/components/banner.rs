use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn render_banner(frame: &mut Frame<'_>, area: Rect, message: &str) {
    let widget = Paragraph::new(format!("⚠ {message}"))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(widget, area);
}

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::engine::FormOrchestrator;

use super::components::{render_banner, render_footer, render_grid, render_option_popup};

pub struct UiContext<'a> {
    pub form: &'a FormOrchestrator,
    pub title: &'a str,
    pub status_message: &'a str,
    pub help: Option<&'a str>,
    /// Place the terminal cursor inside the focused text input.
    pub enable_cursor: bool,
}

/// What one frame put on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Flat names of every input that was drawn.
    pub mounted: Vec<String>,
}

impl RenderReport {
    pub fn is_mounted(&self, name: &str) -> bool {
        self.mounted.iter().any(|mounted| mounted == name)
    }
}

pub fn draw(frame: &mut Frame<'_>, ctx: UiContext<'_>) -> RenderReport {
    let banner = ctx.form.banner();
    let mut constraints = Vec::with_capacity(3);
    if banner.is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(7));
    constraints.push(Constraint::Length(4));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    let mut index = 0;
    if let Some(message) = banner {
        render_banner(frame, chunks[index], message);
        index += 1;
    }
    let mut report = RenderReport::default();
    render_grid(frame, chunks[index], &ctx, &mut report);
    render_footer(frame, chunks[index + 1], &ctx);
    render_option_popup(frame, ctx.form);
    report
}

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
};
use unicode_width::UnicodeWidthStr;

const FILLED: &str = "●";
const EMPTY: &str = "○";
const LEFT_CHEVRON: &str = "≪";
const RIGHT_CHEVRON: &str = "≫";
/// Spaces Tabs puts around each title plus the divider.
const TAB_PADDING: usize = 3;

/// One locale tab: code, filled/empty, invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleTab<'a> {
    pub locale: &'a str,
    pub filled: bool,
    pub invalid: bool,
}

impl LocaleTab<'_> {
    fn title(&self) -> String {
        format!("{} {}", if self.filled { FILLED } else { EMPTY }, self.locale)
    }

    fn width(&self) -> usize {
        UnicodeWidthStr::width(self.title().as_str()) + TAB_PADDING
    }
}

pub(crate) fn render_locale_tabs(frame: &mut Frame<'_>, area: Rect, tabs: &[LocaleTab<'_>], active: usize, focused: bool) {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    if tabs.is_empty() {
        frame.render_widget(Block::default().borders(Borders::ALL).border_style(border), area);
        return;
    }
    let widths: Vec<usize> = tabs.iter().map(LocaleTab::width).collect();
    let window = visible_window(&widths, active, area.width.saturating_sub(2) as usize);
    let marker = Style::default().fg(Color::DarkGray);
    let titles: Vec<Line<'static>> = (window.start..window.end)
        .map(|index| {
            let tab = &tabs[index];
            let mut spans = Vec::new();
            if window.start > 0 && index == window.start {
                spans.push(Span::styled(format!("{LEFT_CHEVRON} "), marker));
            }
            let style = if tab.invalid {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            spans.push(Span::styled(tab.title(), style));
            if window.end < tabs.len() && index + 1 == window.end {
                spans.push(Span::styled(format!(" {RIGHT_CHEVRON}"), marker));
            }
            Line::from(spans)
        })
        .collect();
    let widget = Tabs::new(titles)
        .select(active.saturating_sub(window.start))
        .block(Block::default().borders(Borders::ALL).border_style(border))
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(widget, area);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    start: usize,
    end: usize,
}

/// Widest run of tabs around `selected` that fits in `available` columns.
fn visible_window(widths: &[usize], selected: usize, available: usize) -> Window {
    if widths.is_empty() {
        return Window { start: 0, end: 0 };
    }
    let selected = selected.min(widths.len() - 1);
    let mut start = selected;
    let mut end = selected + 1;
    let mut used = widths[selected];
    loop {
        let grow_right = end < widths.len() && used + widths[end] <= available;
        if grow_right {
            used += widths[end];
            end += 1;
        }
        let grow_left = start > 0 && used + widths[start - 1] <= available;
        if grow_left {
            start -= 1;
            used += widths[start];
        }
        if !grow_left && !grow_right {
            break;
        }
    }
    Window { start, end }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_fits_when_wide() {
        assert_eq!(visible_window(&[4, 4, 4], 1, 40), Window { start: 0, end: 3 });
    }

    #[test]
    fn selected_stays_visible_when_narrow() {
        let window = visible_window(&[5, 5, 5, 5, 5], 4, 11);
        assert_eq!(window, Window { start: 3, end: 5 });
        let window = visible_window(&[5, 5, 5], 0, 2);
        assert_eq!(window, Window { start: 0, end: 1 });
    }

    #[test]
    fn titles_carry_completion_marker() {
        let tab = LocaleTab {
            locale: "ar",
            filled: false,
            invalid: true,
        };
        assert_eq!(tab.title(), "○ ar");
    }
}

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Centered rectangle no larger than `area`.
pub fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Split `area` into horizontal cells by grid span.
pub fn grid_cells(area: Rect, spans: &[u16], columns: u16) -> Vec<Rect> {
    let columns = columns.max(1) as u32;
    let constraints: Vec<Constraint> = spans
        .iter()
        .map(|span| Constraint::Ratio(*span as u32, columns))
        .collect();
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(popup_rect(area, 20, 4), Rect::new(10, 3, 20, 4));
        assert_eq!(popup_rect(area, 60, 20), area);
    }

    #[test]
    fn half_spans_split_the_row() {
        let cells = grid_cells(Rect::new(0, 0, 80, 3), &[6, 6], 12);
        assert_eq!(cells[0].width, 40);
        assert_eq!(cells[1].x, 40);
    }
}

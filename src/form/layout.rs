use crate::domain::FormDescriptor;

pub const DEFAULT_COLUMNS: u16 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    /// Index into the form's descriptor list.
    pub field: usize,
    pub span: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridRow {
    pub cells: Vec<GridCell>,
}

/// Pack descriptors into rows of `columns`; a missing span takes the full width.
pub fn layout_rows(form: &FormDescriptor, columns: u16) -> Vec<GridRow> {
    let columns = columns.max(1);
    let mut rows: Vec<GridRow> = Vec::new();
    let mut used = 0u16;
    for (index, field) in form.fields.iter().enumerate() {
        let span = field.span.unwrap_or(columns).clamp(1, columns);
        if rows.is_empty() || used + span > columns {
            rows.push(GridRow::default());
            used = 0;
        }
        used += span;
        if let Some(row) = rows.last_mut() {
            row.cells.push(GridCell { field: index, span });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldDescriptor, FieldKind};

    #[test]
    fn packs_by_span_and_clamps() {
        let form = FormDescriptor::new(vec![
            FieldDescriptor::new(FieldKind::Text, "first").with_span(6),
            FieldDescriptor::new(FieldKind::Text, "last").with_span(6),
            FieldDescriptor::new(FieldKind::Text, "bio"),
            FieldDescriptor::new(FieldKind::Text, "zip").with_span(0),
            FieldDescriptor::new(FieldKind::Text, "wide").with_span(40),
        ]);
        let rows = layout_rows(&form, DEFAULT_COLUMNS);
        let shape: Vec<Vec<(usize, u16)>> = rows
            .iter()
            .map(|row| row.cells.iter().map(|cell| (cell.field, cell.span)).collect())
            .collect();
        assert_eq!(
            shape,
            vec![vec![(0, 6), (1, 6)], vec![(2, 12)], vec![(3, 1)], vec![(4, 12)]]
        );
    }
}

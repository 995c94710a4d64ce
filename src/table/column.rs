use std::{cmp::Ordering, fmt, sync::Arc};

use chrono::NaiveDate;
use serde_json::Value;

use crate::validation::rules::DATE_FORMAT;

/// A single cell, typed enough to sort and filter on.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl CellValue {
    /// Read a JSON value; strings shaped like `yyyy-MM-dd` become dates.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Empty,
            Value::Bool(flag) => CellValue::Bool(*flag),
            Value::Number(num) => num.as_f64().map_or(CellValue::Empty, CellValue::Number),
            Value::String(text) if text.is_empty() => CellValue::Empty,
            Value::String(text) => NaiveDate::parse_from_str(text, DATE_FORMAT)
                .map(CellValue::Date)
                .unwrap_or_else(|_| CellValue::Text(text.clone())),
            other => CellValue::Text(other.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Bool(_) => 0,
            CellValue::Number(_) => 1,
            CellValue::Date(_) => 2,
            CellValue::Text(_) => 3,
            CellValue::Empty => 4,
        }
    }

    /// Total order for sorting. Empty cells sort last.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(text) => f.write_str(text),
            CellValue::Number(num) if num.fract() == 0.0 => write!(f, "{}", *num as i64),
            CellValue::Number(num) => write!(f, "{num}"),
            CellValue::Bool(flag) => write!(f, "{flag}"),
            CellValue::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
        }
    }
}

/// How a column reads one row.
pub trait Column<R>: Send + Sync {
    fn id(&self) -> &str;

    fn header(&self) -> &str;

    fn value(&self, row: &R) -> CellValue;

    fn sortable(&self) -> bool {
        true
    }

    fn filterable(&self) -> bool {
        true
    }
}

/// Column backed by an accessor closure.
pub struct BaseColumn<R> {
    id: String,
    header: String,
    accessor: Arc<dyn Fn(&R) -> CellValue + Send + Sync>,
    sortable: bool,
    filterable: bool,
}

impl<R> fmt::Debug for BaseColumn<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseColumn")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .finish()
    }
}

impl<R> Clone for BaseColumn<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: Arc::clone(&self.accessor),
            sortable: self.sortable,
            filterable: self.filterable,
        }
    }
}

impl<R> BaseColumn<R> {
    pub fn new(
        id: impl Into<String>,
        header: impl Into<String>,
        accessor: impl Fn(&R) -> CellValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            accessor: Arc::new(accessor),
            sortable: true,
            filterable: true,
        }
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }
}

impl BaseColumn<Value> {
    /// Column reading the key `id` of a JSON row object.
    pub fn json(id: impl Into<String>, header: impl Into<String>) -> Self {
        let id = id.into();
        let key = id.clone();
        Self::new(id, header, move |row: &Value| {
            row.get(&key).map_or(CellValue::Empty, CellValue::from_json)
        })
    }
}

impl<R> Column<R> for BaseColumn<R> {
    fn id(&self) -> &str {
        &self.id
    }

    fn header(&self) -> &str {
        &self.header
    }

    fn value(&self, row: &R) -> CellValue {
        (self.accessor)(row)
    }

    fn sortable(&self) -> bool {
        self.sortable
    }

    fn filterable(&self) -> bool {
        self.filterable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_sorts_after_everything() {
        let mut cells = vec![
            CellValue::Empty,
            CellValue::Text("beta".into()),
            CellValue::Number(2.0),
            CellValue::Text("Alpha".into()),
        ];
        cells.sort_by(CellValue::total_cmp);
        assert_eq!(
            cells,
            vec![
                CellValue::Number(2.0),
                CellValue::Text("Alpha".into()),
                CellValue::Text("beta".into()),
                CellValue::Empty,
            ]
        );
    }

    #[test]
    fn json_column_reads_dates_and_numbers() {
        let column = BaseColumn::json("created_at", "Created");
        let row = json!({ "created_at": "2024-03-10", "id": 4 });
        assert_eq!(
            column.value(&row),
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap())
        );
        assert_eq!(BaseColumn::json("id", "Id").value(&row).to_string(), "4");
        assert!(BaseColumn::json("missing", "?").value(&row).is_empty());
    }
}

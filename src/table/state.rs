use std::collections::BTreeSet;

use chrono::NaiveDate;
use indexmap::IndexMap;

use super::column::CellValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Text,
    Select,
    MultiSelect,
    Date,
}

/// A filter the table offers, bound to one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDef {
    pub id: String,
    pub column: String,
    pub kind: FilterKind,
}

impl FilterDef {
    pub fn new(id: impl Into<String>, column: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            id: id.into(),
            column: column.into(),
            kind,
        }
    }

    /// Whether `value` has the shape this filter expects.
    pub fn accepts(&self, value: &FilterValue) -> bool {
        matches!(
            (self.kind, value),
            (FilterKind::Text | FilterKind::Select, FilterValue::Text(_))
                | (FilterKind::MultiSelect, FilterValue::Many(_))
                | (FilterKind::Date, FilterValue::Date(_))
        )
    }

    pub fn matches(&self, cell: &CellValue, value: &FilterValue) -> bool {
        match (self.kind, value) {
            (FilterKind::Text, FilterValue::Text(needle)) => cell
                .to_string()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            (FilterKind::Select, FilterValue::Text(expected)) => cell.to_string() == *expected,
            (FilterKind::MultiSelect, FilterValue::Many(options)) => {
                options.is_empty() || options.iter().any(|option| cell.to_string() == *option)
            }
            (FilterKind::Date, FilterValue::Date(date)) => match cell {
                CellValue::Date(cell) => cell == date,
                _ => false,
            },
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Many(Vec<String>),
    Date(NaiveDate),
}

impl FilterValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(text) => text.is_empty(),
            FilterValue::Many(values) => values.is_empty(),
            FilterValue::Date(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }

    /// `name` is ascending, `-name` descending.
    pub fn parse(raw: &str) -> Option<Self> {
        let (descending, column) = match raw.strip_prefix('-') {
            Some(column) => (true, column),
            None => (false, raw),
        };
        (!column.is_empty()).then(|| Self {
            column: column.to_string(),
            descending,
        })
    }

    pub fn to_query(&self) -> String {
        if self.descending {
            format!("-{}", self.column)
        } else {
            self.column.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Query key carrying the global search text.
    pub search_key: String,
    pub default_limit: usize,
    pub url_sync: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            search_key: "search".to_string(),
            default_limit: 10,
            url_sync: true,
        }
    }
}

impl TableConfig {
    pub fn with_search_key(mut self, key: impl Into<String>) -> Self {
        self.search_key = key.into();
        self
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    pub fn with_url_sync(mut self, enabled: bool) -> Self {
        self.url_sync = enabled;
        self
    }
}

/// Sorting, filtering, search, pagination and selection of one table view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    pub sorting: Vec<SortKey>,
    pub filters: IndexMap<String, FilterValue>,
    pub search: String,
    /// 1-based.
    pub page: usize,
    pub limit: usize,
    pub selected: BTreeSet<usize>,
}

impl TableState {
    pub fn new(limit: usize) -> Self {
        Self {
            sorting: Vec::new(),
            filters: IndexMap::new(),
            search: String::new(),
            page: 1,
            limit: limit.max(1),
            selected: BTreeSet::new(),
        }
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) * self.limit
    }
}

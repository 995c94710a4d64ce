use std::{io::Write, sync::Arc};

use tracing::debug;

use super::column::{CellValue, Column};
use super::error::{Result, TableError};
use super::export::write_csv;
use super::history::UrlNavigator;
use super::query::{from_query, to_query};
use super::source::{DataPage, DataSource, ExportSource, PaginationMeta, PaginationMode};
use super::state::{FilterDef, FilterKind, FilterValue, SortKey, TableConfig, TableState};

/// One computed page of rows.
#[derive(Debug)]
pub struct TableView<'r, R> {
    pub rows: Vec<&'r R>,
    /// Rows matching filters and search, across all pages.
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
}

/// Sorting, filtering, search and pagination over caller rows, optionally
/// mirrored into a navigable query string.
pub struct DataTable<R> {
    columns: Vec<Arc<dyn Column<R>>>,
    filters: Vec<FilterDef>,
    config: TableConfig,
    state: TableState,
    mode: PaginationMode,
    navigator: Option<Box<dyn UrlNavigator>>,
}

impl<R> std::fmt::Debug for DataTable<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTable")
            .field("columns", &self.columns.iter().map(|c| c.id()).collect::<Vec<_>>())
            .field("filters", &self.filters)
            .field("state", &self.state)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl<R> DataTable<R> {
    pub fn new(columns: Vec<Arc<dyn Column<R>>>, config: TableConfig) -> Self {
        let state = TableState::new(config.default_limit);
        Self {
            columns,
            filters: Vec::new(),
            config,
            state,
            mode: PaginationMode::Client,
            navigator: None,
        }
    }

    pub fn with_filters(mut self, filters: Vec<FilterDef>) -> Self {
        self.filters = filters;
        self
    }

    /// Attach a navigator; the table adopts the state already in its URL.
    pub fn with_navigator(mut self, navigator: Box<dyn UrlNavigator>) -> Self {
        self.navigator = Some(navigator);
        self.restore_from_url();
        self
    }

    pub fn columns(&self) -> &[Arc<dyn Column<R>>] {
        &self.columns
    }

    pub fn filters(&self) -> &[FilterDef] {
        &self.filters
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn mode(&self) -> PaginationMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PaginationMode) {
        self.mode = mode;
    }

    pub fn query(&self) -> String {
        to_query(&self.state, &self.config, &self.filters)
    }

    pub fn navigator(&self) -> Option<&dyn UrlNavigator> {
        self.navigator.as_deref()
    }

    /// Cycle a column through ascending, descending and unsorted.
    pub fn toggle_sort(&mut self, column: &str) -> Result<()> {
        self.sortable_column(column)?;
        let next = match self.state.sorting.first() {
            Some(key) if key.column == column && !key.descending => vec![SortKey::desc(column)],
            Some(key) if key.column == column => Vec::new(),
            _ => vec![SortKey::asc(column)],
        };
        self.state.sorting = next;
        self.changed(false);
        Ok(())
    }

    pub fn set_sorting(&mut self, sorting: Vec<SortKey>) -> Result<()> {
        for key in &sorting {
            self.sortable_column(&key.column)?;
        }
        self.state.sorting = sorting;
        self.changed(false);
        Ok(())
    }

    /// Set or clear (`None` or empty) one filter. Resets to page 1.
    pub fn set_filter(&mut self, id: &str, value: Option<FilterValue>) -> Result<()> {
        let def = self
            .filters
            .iter()
            .find(|def| def.id == id)
            .ok_or_else(|| TableError::UnknownFilter(id.to_string()))?;
        match value {
            Some(value) if !value.is_empty() => {
                if !def.accepts(&value) {
                    return Err(TableError::FilterKindMismatch {
                        id: id.to_string(),
                        expected: match def.kind {
                            FilterKind::MultiSelect => "list",
                            FilterKind::Date => "date",
                            _ => "text",
                        },
                    });
                }
                self.state.filters.insert(id.to_string(), value);
            }
            _ => {
                self.state.filters.shift_remove(id);
            }
        }
        self.changed(true);
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        self.state.filters.clear();
        self.state.search.clear();
        self.changed(true);
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.state.search = search.into();
        self.changed(true);
    }

    pub fn set_page(&mut self, page: usize) {
        self.state.page = page.max(1);
        self.changed(false);
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.state.limit = limit.max(1);
        self.changed(true);
    }

    pub fn toggle_selected(&mut self, index: usize) {
        if !self.state.selected.remove(&index) {
            self.state.selected.insert(index);
        }
    }

    pub fn select_all(&mut self, count: usize) {
        self.state.selected = (0..count).collect();
    }

    pub fn clear_selection(&mut self) {
        self.state.selected.clear();
    }

    /// Re-read state from the navigator, e.g. after back/forward.
    pub fn restore_from_url(&mut self) {
        if let Some(navigator) = &self.navigator {
            self.state = from_query(&navigator.current(), &self.config, &self.filters);
        }
    }

    pub fn back(&mut self) -> bool {
        let moved = self.navigator.as_mut().is_some_and(|navigator| navigator.back());
        if moved {
            self.restore_from_url();
        }
        moved
    }

    pub fn forward(&mut self) -> bool {
        let moved = self.navigator.as_mut().is_some_and(|navigator| navigator.forward());
        if moved {
            self.restore_from_url();
        }
        moved
    }

    /// Compute the visible page. In server mode `rows` is already that page.
    pub fn view<'r>(&self, rows: &'r [R]) -> TableView<'r, R> {
        if let PaginationMode::Server(meta) = self.mode {
            return TableView {
                rows: rows.iter().collect(),
                total: rows.len(),
                page: meta.current_page.max(1),
                page_count: meta.last_page,
            };
        }
        let mut matching: Vec<&R> = rows.iter().filter(|row| self.matches(row)).collect();
        self.sort_rows(&mut matching);
        let total = matching.len();
        let page_count = total.div_ceil(self.state.limit);
        let page = self.state.page.min(page_count.max(1));
        let start = (page - 1) * self.state.limit;
        let rows = matching.into_iter().skip(start).take(self.state.limit).collect();
        TableView {
            rows,
            total,
            page,
            page_count,
        }
    }

    /// Ask `source` for the current page, switching to server mode when it reports metadata.
    pub async fn load(&mut self, source: &dyn DataSource<R>) -> Result<Vec<R>>
    where
        R: Send,
    {
        let DataPage { rows, meta } = source.load(&self.state).await?;
        if let Some(meta) = meta {
            self.mode = PaginationMode::Server(PaginationMeta {
                current_page: meta.current_page.max(1),
                last_page: meta.last_page,
            });
        }
        debug!(rows = rows.len(), page = self.state.page, "table page loaded");
        Ok(rows)
    }

    /// Export the selected rows of `view` as CSV.
    pub fn export_selected<W: Write>(&self, view: &TableView<'_, R>, writer: W) -> Result<usize> {
        let selected: Vec<&R> = self
            .state
            .selected
            .iter()
            .filter_map(|index| view.rows.get(*index).copied())
            .collect();
        if selected.is_empty() {
            return Err(TableError::NothingToExport);
        }
        write_csv(&self.columns, selected, writer)
    }

    /// Export the full dataset fetched from `source` as CSV.
    pub async fn export_all<W: Write>(&self, source: &dyn ExportSource<R>, writer: W) -> Result<usize>
    where
        R: Send,
    {
        let rows = source.fetch_all(&self.state).await?;
        write_csv(&self.columns, rows.iter(), writer)
    }

    fn sortable_column(&self, id: &str) -> Result<&Arc<dyn Column<R>>> {
        self.columns
            .iter()
            .find(|column| column.id() == id && column.sortable())
            .ok_or_else(|| TableError::UnknownColumn(id.to_string()))
    }

    fn cell(&self, column: &str, row: &R) -> CellValue {
        self.columns
            .iter()
            .find(|candidate| candidate.id() == column)
            .map_or(CellValue::Empty, |column| column.value(row))
    }

    fn matches(&self, row: &R) -> bool {
        let filtered = self.state.filters.iter().all(|(id, value)| {
            self.filters
                .iter()
                .find(|def| def.id == *id)
                .is_none_or(|def| def.matches(&self.cell(&def.column, row), value))
        });
        if !filtered {
            return false;
        }
        let needle = self.state.search.trim().to_lowercase();
        needle.is_empty()
            || self
                .columns
                .iter()
                .filter(|column| column.filterable())
                .any(|column| column.value(row).to_string().to_lowercase().contains(&needle))
    }

    fn sort_rows(&self, rows: &mut [&R]) {
        if self.state.sorting.is_empty() {
            return;
        }
        rows.sort_by(|a, b| {
            for key in &self.state.sorting {
                let (left, right) = (self.cell(&key.column, a), self.cell(&key.column, b));
                let ordering = match (left.is_empty(), right.is_empty()) {
                    (false, false) if key.descending => right.total_cmp(&left),
                    _ => left.total_cmp(&right),
                };
                if ordering.is_ne() {
                    return ordering;
                }
            }
            std::cmp::Ordering::Equal
        });
    }

    fn changed(&mut self, reset_page: bool) {
        if reset_page {
            self.state.page = 1;
        }
        self.state.selected.clear();
        if !self.config.url_sync {
            return;
        }
        let query = self.query();
        if let Some(navigator) = self.navigator.as_mut() {
            navigator.push(query);
        }
    }
}

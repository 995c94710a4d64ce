//! Data-table state: sorting, filters, search, pagination, URL sync and export.

mod column;
mod error;
mod export;
mod history;
mod query;
mod source;
mod state;
mod table;

pub use column::{BaseColumn, CellValue, Column};
pub use error::TableError;
pub use export::{export_filename, write_csv};
pub use history::{MemoryHistory, UrlNavigator};
pub use query::{LIMIT_KEY, PAGE_KEY, SORT_KEY, from_query, to_query};
pub use source::{DataPage, DataSource, ExportSource, PaginationMeta, PaginationMode};
pub use state::{FilterDef, FilterKind, FilterValue, SortKey, TableConfig, TableState};
pub use table::{DataTable, TableView};

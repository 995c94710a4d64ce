use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::state::TableState;

/// Page metadata reported by a server-paginated endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub current_page: usize,
    pub last_page: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginationMode {
    /// Page count comes from the filtered local rows.
    #[default]
    Client,
    /// Rows are already one page; the count comes from the server.
    Server(PaginationMeta),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataPage<R> {
    pub rows: Vec<R>,
    pub meta: Option<PaginationMeta>,
}

/// Loads the rows for the current table state.
#[async_trait]
pub trait DataSource<R: Send>: Send + Sync {
    async fn load(&self, state: &TableState) -> Result<DataPage<R>>;
}

/// Fetches the full dataset for export.
#[async_trait]
pub trait ExportSource<R: Send>: Send + Sync {
    async fn fetch_all(&self, state: &TableState) -> Result<Vec<R>>;
}

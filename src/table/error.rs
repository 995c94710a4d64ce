#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    #[error("unknown filter '{0}'")]
    UnknownFilter(String),
    #[error("filter '{id}' expects a {expected} value")]
    FilterKindMismatch { id: String, expected: &'static str },
    #[error("nothing to export")]
    NothingToExport,
    #[error("data source failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<anyhow::Error> for TableError {
    fn from(err: anyhow::Error) -> Self {
        TableError::Source(err.into())
    }
}

pub type Result<T, E = TableError> = std::result::Result<T, E>;

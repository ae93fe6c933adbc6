use thiserror::Error;

/// Errors emitted by factories, stores and the generation engine.
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("binding error: {0}")]
    Binding(#[from] bdigen_core::Error),
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    #[error("table '{table}' already holds {rows} rows")]
    TableNotEmpty { table: String, rows: i64 },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

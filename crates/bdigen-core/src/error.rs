use thiserror::Error;

/// Core error type shared across bdigen crates.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The mapping violates structural invariants.
    #[error("invalid mapping: {0}")]
    InvalidMapping(String),
    /// A factory needs a table the mapping does not declare.
    #[error("table not bound: {0}")]
    MissingTable(String),
    /// A factory populates a column the mapped table does not carry.
    #[error("column not bound: {table}.{column}")]
    MissingColumn { table: String, column: String },
}

/// Convenience alias for results returned by bdigen crates.
pub type Result<T> = std::result::Result<T, Error>;

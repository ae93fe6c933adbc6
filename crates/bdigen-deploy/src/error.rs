use thiserror::Error;

/// Errors raised while preparing or deploying metadata.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("invalid option: {0}")]
    InvalidOption(String),
    #[error("describe of '{sobject}' has no field '{field}'")]
    MissingField { sobject: String, field: String },
    #[error("field '{field}' has no active picklist value")]
    NoActiveValue { field: String },
    #[error("describe source returned '{found}' when '{expected}' was requested")]
    DescribeMismatch { expected: String, found: String },
    #[error("deploy failed: {0}")]
    Deploy(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DeployError>;

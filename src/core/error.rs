/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// The database file could not be opened or is not a SQLite database
    #[error("Connection error: {0}")]
    Connection(String),

    /// A query was issued after the connection was closed
    #[error("Connection is closed")]
    ClosedConnection,

    /// Unparseable date bounds or `from` after `to`
    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    /// Underlying SQL failure (missing table, bad column, decode mismatch)
    #[error("Query execution error: {0}")]
    QueryExecution(#[from] sqlx::Error),

    /// Validation errors for query parameters
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Report output errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Chart drawing or SVG output errors
    #[error("Chart error: {0}")]
    Chart(String),
}

// Helper functions for common error scenarios
impl AppError {
    pub fn connection(msg: impl Into<String>) -> Self {
        AppError::Connection(msg.into())
    }

    pub fn invalid_range(msg: impl Into<String>) -> Self {
        AppError::InvalidRange(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    /// Wrap a failed row conversion as a query failure
    pub fn decode(column: &str, msg: impl std::fmt::Display) -> Self {
        AppError::QueryExecution(sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: msg.to_string().into(),
        })
    }
}

//! Error types for calendar, ingestion and configuration operations.

/// Result type for timeline operations
pub type TimelineResult<T> = Result<T, TimelineError>;

/// Error type for timeline operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimelineError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Data validation error: {0}")]
    ValidationError(String),
}

impl TimelineError {
    pub fn parse(msg: impl Into<String>) -> Self {
        TimelineError::ParseError(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        TimelineError::ConfigurationError(msg.into())
    }
}

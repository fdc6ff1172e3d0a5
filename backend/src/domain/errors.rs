/// Errors returned by every report operation
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Missing or unparseable input; raised before the record store is touched
    #[error("{0}")]
    InvalidParameters(String),
    /// The record store failed or returned data that could not be decoded
    #[error("Query execution failed")]
    QueryExecutionFailure(#[source] anyhow::Error),
}

impl ReportError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        ReportError::InvalidParameters(reason.into())
    }
}

//! Error handling types and utilities.

/// A specialized Result type for fallible setup paths (config, index loading).
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Error returned by a field value lookup collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The endpoint could not be reached or answered with a failure.
    #[error("field value lookup failed: {0}")]
    Endpoint(String),
    /// A sub-request names a field the endpoint does not know.
    #[error("unknown field '{0}'")]
    UnknownField(String),
    /// A query expression could not be understood.
    #[error("invalid query expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },
}

/// Error returned when computing suggestions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SuggestError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    /// A newer call started while this one was waiting on the lookup.
    #[error("suggestion request {generation} was superseded by request {latest}")]
    Superseded { generation: u64, latest: u64 },
}

impl SuggestError {
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }
}

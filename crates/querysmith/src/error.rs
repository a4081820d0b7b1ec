//! Error types for querysmith

use thiserror::Error;

/// Result type alias for querysmith operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Error types for statement parsing and rewriting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The text could not be cut into clauses for its statement kind
    #[error("Unable to parse query: {0}")]
    Parse(String),

    /// Operation not supported by the statement kind (or clause state)
    #[error("{0}")]
    UnsupportedOperation(String),

    /// Requested subquery does not exist
    #[error("Unable to get subquery #{index}: Query only has {count} subqueries.")]
    IndexOutOfRange { index: usize, count: usize },

    /// Named query requested before a resolver was installed
    #[error("Unable to load named queries: first tell how using configure().")]
    UnconfiguredRegistry,

    /// Caller-supplied argument that cannot be applied
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl QueryError {
    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Create an unsupported-operation error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedOperation(message.into())
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Check if this is a parse error
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    /// Check if this is an unsupported-operation error
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedOperation(_))
    }

    /// Check if this is an index-out-of-range error
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }

    /// Check if this is an unconfigured-registry error
    pub fn is_unconfigured_registry(&self) -> bool {
        matches!(self, Self::UnconfiguredRegistry)
    }

    /// Check if this is an invalid-argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subquery_message_carries_index_and_count() {
        let err = QueryError::IndexOutOfRange { index: 3, count: 1 };
        assert_eq!(
            err.to_string(),
            "Unable to get subquery #3: Query only has 1 subqueries."
        );
        assert!(err.is_index_out_of_range());
    }

    #[test]
    fn unsupported_message_is_verbatim() {
        let err = QueryError::unsupported("It's not possible to extract columns of a UPDATE query.");
        assert_eq!(
            err.to_string(),
            "It's not possible to extract columns of a UPDATE query."
        );
        assert!(err.is_unsupported());
        assert!(!err.is_parse());
    }

    #[test]
    fn unconfigured_registry_message() {
        assert_eq!(
            QueryError::UnconfiguredRegistry.to_string(),
            "Unable to load named queries: first tell how using configure()."
        );
    }
}

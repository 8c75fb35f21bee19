//! Query layer errors.

use dynaquery_model::{CodecError, StoreError};

/// Result alias for query building, compilation and execution.
pub type QueryResult<T> = Result<T, QueryError>;

/// Everything that can go wrong between a fluent call and a decoded result.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// A shorthand method name with no entry in the dispatch table, or one
    /// called with arguments of the wrong shape.
    #[error("call to undefined method {method}")]
    UndefinedMethod {
        /// The name as called.
        method: String,
    },
    /// A predicate whose operator or function cannot be rendered.
    #[error("unsupported predicate `{token}`: {reason}")]
    UnsupportedPredicate {
        /// The offending operator or function token.
        token: String,
        /// What is wrong with it.
        reason: String,
    },
    /// An expression references a placeholder that was never interned.
    #[error("placeholder {key} is not declared")]
    DanglingPlaceholder {
        /// The `#n` or `:n` key.
        key: String,
    },
    /// Response decoding failed.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// A key is empty or lacks declared key attributes.
    #[error("missing key: {0}")]
    MissingKey(String),
    /// The store call failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QueryError {
    pub(crate) fn undefined_method(method: impl Into<String>) -> Self {
        Self::UndefinedMethod {
            method: method.into(),
        }
    }

    pub(crate) fn unsupported(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedPredicate {
            token: token.into(),
            reason: reason.into(),
        }
    }
}

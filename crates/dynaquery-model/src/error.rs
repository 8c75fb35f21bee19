//! Store error types.
//!
//! DynamoDB reports failures as JSON bodies carrying a `__type` field with the
//! fully-qualified error name and a `message`. Store clients turn those bodies
//! (or their own transport failures) into a [`StoreError`], which the query
//! layer surfaces unchanged.

use std::fmt;

/// Well-known DynamoDB error codes seen by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum StoreErrorCode {
    /// Table or index not found.
    ResourceNotFoundException,
    /// Condition check failed.
    ConditionalCheckFailedException,
    /// Item collection size limit exceeded.
    ItemCollectionSizeLimitExceededException,
    /// Provisioned throughput exceeded.
    ProvisionedThroughputExceededException,
    /// Request limit exceeded.
    RequestLimitExceeded,
    /// Request throttled.
    ThrottlingException,
    /// Validation error.
    #[default]
    ValidationException,
    /// Serialization error.
    SerializationException,
    /// Internal server error.
    InternalServerError,
    /// Access denied.
    AccessDeniedException,
    /// Unknown client or credentials.
    UnrecognizedClientException,
    /// The request never reached the store or no response came back.
    TransportError,
}

impl StoreErrorCode {
    const ALL: [Self; 12] = [
        Self::ResourceNotFoundException,
        Self::ConditionalCheckFailedException,
        Self::ItemCollectionSizeLimitExceededException,
        Self::ProvisionedThroughputExceededException,
        Self::RequestLimitExceeded,
        Self::ThrottlingException,
        Self::ValidationException,
        Self::SerializationException,
        Self::InternalServerError,
        Self::AccessDeniedException,
        Self::UnrecognizedClientException,
        Self::TransportError,
    ];

    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResourceNotFoundException => "ResourceNotFoundException",
            Self::ConditionalCheckFailedException => "ConditionalCheckFailedException",
            Self::ItemCollectionSizeLimitExceededException => {
                "ItemCollectionSizeLimitExceededException"
            }
            Self::ProvisionedThroughputExceededException => {
                "ProvisionedThroughputExceededException"
            }
            Self::RequestLimitExceeded => "RequestLimitExceeded",
            Self::ThrottlingException => "ThrottlingException",
            Self::ValidationException => "ValidationException",
            Self::SerializationException => "SerializationException",
            Self::InternalServerError => "InternalServerError",
            Self::AccessDeniedException => "AccessDeniedException",
            Self::UnrecognizedClientException => "UnrecognizedClientException",
            Self::TransportError => "TransportError",
        }
    }

    /// Parse a `__type` value such as
    /// `com.amazonaws.dynamodb.v20120810#ResourceNotFoundException`.
    ///
    /// Only the part after `#` is significant; unknown names yield `None`.
    #[must_use]
    pub fn from_error_type(error_type: &str) -> Option<Self> {
        let name = error_type
            .rsplit_once('#')
            .map_or(error_type, |(_, name)| name);
        Self::ALL.into_iter().find(|code| code.as_str() == name)
    }

    /// Returns `true` for codes a caller may retry after backing off.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ProvisionedThroughputExceededException
                | Self::RequestLimitExceeded
                | Self::ThrottlingException
                | Self::InternalServerError
                | Self::TransportError
        )
    }

    /// Returns the default HTTP status code for this error.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::InternalServerError => http::StatusCode::INTERNAL_SERVER_ERROR,
            Self::TransportError => http::StatusCode::BAD_GATEWAY,
            _ => http::StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed store call.
#[derive(Debug)]
pub struct StoreError {
    /// The error code.
    pub code: StoreErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StoreError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for StoreError {}

impl StoreError {
    /// Create a new `StoreError` from an error code.
    #[must_use]
    pub fn new(code: StoreErrorCode) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: code.as_str().to_owned(),
            code,
        }
    }

    /// Create a new `StoreError` with a custom message.
    #[must_use]
    pub fn with_message(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
        }
    }

    /// Set the HTTP status code.
    #[must_use]
    pub fn with_status(mut self, status: http::StatusCode) -> Self {
        self.status_code = status;
        self
    }

    /// Build an error from a DynamoDB JSON error body.
    ///
    /// Unknown `__type` names fall back to the status-derived default
    /// (`InternalServerError` for 5xx, `ValidationException` otherwise) and
    /// keep the original name in the message.
    #[must_use]
    pub fn from_body(status: http::StatusCode, body: &serde_json::Value) -> Self {
        let error_type = body.get("__type").and_then(serde_json::Value::as_str);
        let message = body
            .get("message")
            .or_else(|| body.get("Message"))
            .and_then(serde_json::Value::as_str);

        let code = error_type
            .and_then(StoreErrorCode::from_error_type)
            .unwrap_or(if status.is_server_error() {
                StoreErrorCode::InternalServerError
            } else {
                StoreErrorCode::ValidationException
            });

        let message = match (message, error_type) {
            (Some(m), _) => m.to_owned(),
            (None, Some(t)) => t.to_owned(),
            (None, None) => code.as_str().to_owned(),
        };

        Self::with_message(code, message).with_status(status)
    }
}

/// Create a `StoreError` from an error code.
///
/// # Examples
///
/// ```
/// use dynaquery_model::store_error;
/// use dynaquery_model::error::StoreErrorCode;
///
/// let err = store_error!(ValidationException);
/// assert_eq!(err.code, StoreErrorCode::ValidationException);
///
/// let err = store_error!(ResourceNotFoundException, "Table not found");
/// assert_eq!(err.message, "Table not found");
/// ```
#[macro_export]
macro_rules! store_error {
    ($code:ident) => {
        $crate::error::StoreError::new($crate::error::StoreErrorCode::$code)
    };
    ($code:ident, $msg:expr) => {
        $crate::error::StoreError::with_message($crate::error::StoreErrorCode::$code, $msg)
    };
}

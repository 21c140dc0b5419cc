//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Error returned by a storage port implementation.
///
/// The engine never interprets the message beyond classifying the failure;
/// a failed storage call always fails the enclosing operation.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backing store is unreachable or rejected the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The backing store returned data the engine cannot interpret.
    #[error("Storage corrupted: {0}")]
    Corrupted(String),
}

/// Application error types used at the boundary with the application layer.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Access denied.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::Unauthorized(String::new()), "UNAUTHORIZED")]
    #[case(AppError::Forbidden(String::new()), "FORBIDDEN")]
    #[case(AppError::NotFound(String::new()), "NOT_FOUND")]
    #[case(AppError::Validation(String::new()), "VALIDATION_ERROR")]
    #[case(AppError::BusinessRule(String::new()), "BUSINESS_RULE_VIOLATION")]
    #[case(AppError::Database(String::new()), "DATABASE_ERROR")]
    #[case(AppError::Internal(String::new()), "INTERNAL_ERROR")]
    fn test_error_codes(#[case] error: AppError, #[case] code: &str) {
        assert_eq!(error.error_code(), code);
    }

    #[test]
    fn test_store_error_converts_to_database() {
        let err: AppError = StoreError::Unavailable("connection refused".into()).into();
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert_eq!(
            err.to_string(),
            "Database error: Storage unavailable: connection refused"
        );
    }
}

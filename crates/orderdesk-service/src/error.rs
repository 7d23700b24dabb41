//! # Service Error Type
//!
//! The error every service operation returns.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ValidationError ─┐                                                     │
//! │  CoreError ───────┼──────────────────────────► InvalidRequest   (400)  │
//! │                   │                                                     │
//! │  DbError          │                                                     │
//! │  ├── NotFound ────┼──────────────────────────► ResourceNotFound (404)  │
//! │  ├── Unique / FK / CHECK violation ──────────► InvalidRequest   (400)  │
//! │  └── anything else ─── error!(..) logged ────► Database         (500)  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A REST layer maps a `ServiceError` with [`ServiceError::status_code`] and
//! serialises [`ErrorResponse`]:
//! ```json
//! { "code": "RESOURCE_NOT_FOUND", "message": "Customer not found: ALFKI" }
//! ```

use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use orderdesk_core::{CoreError, ValidationError};
use orderdesk_db::DbError;

/// Errors returned by the services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The addressed record does not exist.
    #[error("{0}")]
    ResourceNotFound(String),

    /// The request is malformed or breaks a business rule.
    #[error("{0}")]
    InvalidRequest(String),

    /// Unexpected storage failure.
    #[error("Database operation failed: {0}")]
    Database(#[source] DbError),
}

impl ServiceError {
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ServiceError::ResourceNotFound(format!("{} not found: {}", resource, id))
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::InvalidRequest(message.into())
    }

    /// HTTP status a REST boundary would answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::ResourceNotFound(_) => 404,
            ServiceError::InvalidRequest(_) => 400,
            ServiceError::Database(_) => 500,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::ResourceNotFound(_) => ErrorCode::ResourceNotFound,
            ServiceError::InvalidRequest(_) => ErrorCode::InvalidRequest,
            ServiceError::Database(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::ResourceNotFound(_))
    }

    pub fn is_invalid_request(&self) -> bool {
        matches!(self, ServiceError::InvalidRequest(_))
    }
}

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ResourceNotFound,
    InvalidRequest,
    DatabaseError,
}

/// Serialisable error body.
///
/// Storage failures carry a generic message; the detail is only logged.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&ServiceError> for ErrorResponse {
    fn from(err: &ServiceError) -> Self {
        let message = match err {
            ServiceError::Database(_) => "Database operation failed".to_string(),
            other => other.to_string(),
        };

        ErrorResponse {
            code: err.code(),
            message,
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ServiceError::not_found(&entity, id),
            DbError::UniqueViolation { field, .. } => {
                ServiceError::InvalidRequest(format!("A record with this {} already exists", field))
            }
            DbError::ForeignKeyViolation { message } => {
                warn!("Foreign key violation: {}", message);
                ServiceError::invalid("Referenced record does not exist or is still in use")
            }
            DbError::CheckViolation { message } => {
                warn!("Check constraint violation: {}", message);
                ServiceError::InvalidRequest(message)
            }
            other => {
                error!("Database operation failed: {}", other);
                ServiceError::Database(other)
            }
        }
    }
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => e.into(),
            other => ServiceError::InvalidRequest(other.to_string()),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::InvalidRequest(err.to_string())
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_mapping() {
        let err: ServiceError = DbError::not_found("Product", 11).into();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Product not found: 11");

        let err: ServiceError = DbError::duplicate("orders.id", "10248").into();
        assert!(err.is_invalid_request());

        let err: ServiceError = DbError::ForeignKeyViolation {
            message: "FOREIGN KEY constraint failed".to_string(),
        }
        .into();
        assert!(err.is_invalid_request());

        let err: ServiceError = DbError::PoolExhausted.into();
        assert!(matches!(err, ServiceError::Database(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_core_errors_are_invalid_requests() {
        let err: ServiceError = CoreError::InsufficientStock {
            product: "Chai".to_string(),
            available: 3,
            requested: 5,
        }
        .into();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("Chai"));

        let err: ServiceError = CoreError::Validation(ValidationError::Negative {
            field: "product_id".to_string(),
        })
        .into();
        assert_eq!(err.to_string(), "product_id must not be negative");
    }

    #[test]
    fn test_error_response_hides_database_detail() {
        let err = ServiceError::Database(DbError::QueryFailed("no such table: orders".to_string()));
        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(body["code"], "DATABASE_ERROR");
        assert_eq!(body["message"], "Database operation failed");

        let err = ServiceError::not_found("Customer", "ALFKI");
        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(body["code"], "RESOURCE_NOT_FOUND");
        assert_eq!(body["message"], "Customer not found: ALFKI");
    }
}

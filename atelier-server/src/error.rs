//! API error handling module
//!
//! Provides a unified error type for all API endpoints with structured error
//! variants. Classifier outages never surface here; they are absorbed by
//! the fail-open policy inside `atelier-core` before a handler sees them.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::catalog::CatalogError;

/// API error type with structured variants for different error categories
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request - client provided invalid input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unauthorized - caller does not own the targeted resource
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Not found - requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict - optimistic revision check failed on a catalog write
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error - unexpected server-side failure
    #[error("Internal error: {0}")]
    Internal(String),

    /// Core domain error (validation)
    #[error("Domain error: {0}")]
    Core(#[from] atelier_core::CoreError),

    /// Catalog persistence error
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl ApiError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create an internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Core(ref e) => match e {
                // Client-provided invalid input → 400
                atelier_core::CoreError::Validation(_) => StatusCode::BAD_REQUEST,

                // Everything else from core reaching a handler is a bug in
                // the fail-open boundary → 500
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Catalog(ref e) => match e {
                CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
                CatalogError::Conflict { .. } => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Get the error code for programmatic error handling
    fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "INVALID_INPUT",
            Self::Unauthorized(_) => "NOT_OWNER",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "REVISION_CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Core(ref e) => match e {
                atelier_core::CoreError::Validation(_) => "VALIDATION_FAILED",
                atelier_core::CoreError::ClassifierUnavailable(_)
                | atelier_core::CoreError::InvalidClassifierResponse(_)
                | atelier_core::CoreError::HttpError(_) => "CLASSIFIER_ERROR",
            },
            Self::Catalog(ref e) => match e {
                CatalogError::NotFound(_) => "NOT_FOUND",
                CatalogError::Conflict { .. } => "REVISION_CONFLICT",
                CatalogError::Connection(_) => "CATALOG_UNAVAILABLE",
                CatalogError::Migration(_) => "CATALOG_MIGRATION",
                CatalogError::Query(_) => "CATALOG_QUERY",
                CatalogError::Serialization(_) => "CATALOG_SERIALIZATION",
            },
        }
    }

    /// Get sanitized error message for client response
    fn client_message(&self) -> String {
        match self {
            // Persistence internals stay out of client responses; the retry
            // affordance only needs the code and a stable message
            Self::Catalog(ref e) => match e {
                CatalogError::NotFound(id) => format!("Listing {id} not found"),
                CatalogError::Conflict { .. } => {
                    "The listing changed while you were working; reload and retry".to_string()
                }
                _ => "Catalog write failed; please retry".to_string(),
            },
            _ => self.to_string(),
        }
    }

    /// Get the error category for logging
    fn error_category(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Unauthorized(_) => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Internal(_) => "internal",
            Self::Core(_) => "core",
            Self::Catalog(_) => "catalog",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let category = self.error_category();
        let code = self.error_code();
        let internal_message = self.to_string();
        let client_message = self.client_message();

        // Log based on severity, always including internal details
        match &self {
            Self::BadRequest(_) | Self::NotFound(_) | Self::Unauthorized(_) | Self::Core(_) => {
                tracing::warn!(
                    status = %status,
                    category = category,
                    code = code,
                    error = %internal_message,
                    "Client error"
                );
            }
            Self::Conflict(_) => {
                tracing::warn!(
                    status = %status,
                    category = category,
                    code = code,
                    error = %internal_message,
                    "Revision conflict"
                );
            }
            Self::Internal(_) => {
                tracing::error!(
                    status = %status,
                    category = category,
                    code = code,
                    error = %internal_message,
                    "Server error"
                );
            }
            Self::Catalog(ref e) => match e {
                CatalogError::NotFound(_) | CatalogError::Conflict { .. } => {
                    tracing::warn!(
                        status = %status,
                        category = category,
                        code = code,
                        error = %internal_message,
                        "Catalog client error"
                    );
                }
                _ => {
                    tracing::error!(
                        status = %status,
                        category = category,
                        code = code,
                        error = %internal_message,
                        client_message = %client_message,
                        "Catalog error (internal details logged)"
                    );
                }
            },
        }

        // All error responses include a `code` field for programmatic handling
        let body = serde_json::json!({
            "error": client_message,
            "code": code,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_validation_errors_map_to_400() {
        let err = ApiError::from(atelier_core::CoreError::Validation("empty reason".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let err = ApiError::from(CatalogError::Conflict {
            id: Uuid::nil(),
            expected: 3,
            found: 4,
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "REVISION_CONFLICT");
    }

    #[test]
    fn test_catalog_internals_are_sanitized() {
        let err = ApiError::from(CatalogError::Query("relation listings is borked".into()));
        assert!(!err.client_message().contains("borked"));
    }
}

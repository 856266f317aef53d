//! Application error types
//!
//! Unified error handling for the entire application.

use postcraft_core::DomainError;
use serde::Serialize;
use std::fmt;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Resource errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AppError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
            Self::Domain(e) => domain_status(e),
        }
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code())
    }

    /// Create a not found error for a resource type
    #[must_use]
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::NotFound(resource.to_string())
    }

    /// Create a validation error
    #[must_use]
    pub fn validation(msg: impl fmt::Display) -> Self {
        Self::Validation(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// HTTP status for a domain error
#[must_use]
pub fn domain_status(err: &DomainError) -> u16 {
    match err {
        e if e.is_not_found() => 404,
        e if e.is_validation() => 400,
        e if e.is_conflict() => 409,
        DomainError::ConfigurationMissing(_) => 422,
        DomainError::GenerationFailed(_) | DomainError::MalformedGenerationResponse { .. } => 502,
        _ => 500,
    }
}

/// Error response structure for API responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        // Raw model output and the entity id help diagnose a failed generation
        let details = match err {
            AppError::Domain(DomainError::MalformedGenerationResponse { raw, .. }) => {
                Some(serde_json::json!({ "raw": raw }))
            }
            AppError::Domain(DomainError::AuditPersistenceFailed { entity_id, .. }) => {
                Some(serde_json::json!({ "entity_id": entity_id }))
            }
            _ => None,
        };

        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
            details,
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        Self::from(&err)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound("profile".to_string()).status_code(), 404);
        assert_eq!(AppError::Validation("test".to_string()).status_code(), 400);
        assert_eq!(AppError::internal(anyhow::anyhow!("boom")).status_code(), 500);
        assert!(AppError::internal(anyhow::anyhow!("boom")).is_server_error());
    }

    #[test]
    fn test_domain_status_codes() {
        let missing = AppError::from(DomainError::ConfigurationMissing("voice".to_string()));
        assert_eq!(missing.status_code(), 422);
        assert!(missing.is_client_error());

        let failed = AppError::from(DomainError::GenerationFailed("timeout".to_string()));
        assert_eq!(failed.status_code(), 502);
        assert!(failed.is_server_error());

        let audit = AppError::from(DomainError::AuditPersistenceFailed {
            reason: "db down".to_string(),
            entity_id: postcraft_core::EntityId::new(),
        });
        assert_eq!(audit.status_code(), 500);
        assert_eq!(audit.error_code(), "AUDIT_PERSISTENCE_FAILED");
    }

    #[test]
    fn test_error_response() {
        let err = AppError::NotFound("voice profile".to_string());
        let response = ErrorResponse::from(&err);

        assert_eq!(response.code, "NOT_FOUND");
        assert_eq!(response.message, "Resource not found: voice profile");
        assert!(response.details.is_none());
    }

    #[test]
    fn test_malformed_response_details() {
        let err = AppError::from(DomainError::MalformedGenerationResponse {
            reason: "expected value".to_string(),
            raw: "oops".to_string(),
        });
        let response = ErrorResponse::from(err);
        assert_eq!(response.code, "MALFORMED_GENERATION_RESPONSE");
        assert_eq!(response.details.unwrap()["raw"], "oops");
    }

    #[test]
    fn test_helper_methods() {
        let err = AppError::not_found("template 123");
        assert_eq!(err.to_string(), "Resource not found: template 123");

        let err = AppError::validation("name is required");
        assert_eq!(err.to_string(), "Validation error: name is required");
    }
}

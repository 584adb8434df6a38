//! Domain errors - the failure taxonomy shared by every facade and repository

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // =========================================================================
    // Identity Errors
    // =========================================================================
    #[error("Not authorized")]
    NotAuthorized,

    #[error("Already authorized")]
    AlreadyAuthorized,

    #[error("Invalid username or password")]
    InvalidCredentials,

    // =========================================================================
    // Access Errors
    // =========================================================================
    #[error("Resource is inaccessible")]
    ResourceInaccessible,

    #[error("Rights violation")]
    RightsViolation,

    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("{0} does not exist")]
    DoesNotExist(&'static str),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("{0}")]
    Conflict(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Deadline exceeded")]
    DeadlineExceeded,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed(message.into())
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAuthorized => "NOT_AUTHORIZED",
            Self::AlreadyAuthorized => "ALREADY_AUTHORIZED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::ResourceInaccessible => "RESOURCE_INACCESSIBLE",
            Self::RightsViolation => "RIGHTS_VIOLATION",
            Self::DoesNotExist(_) => "DOES_NOT_EXIST",
            Self::ValidationFailed(_) => "VALIDATION_FAILED",
            Self::Conflict(_) => "CONFLICT",
            Self::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DoesNotExist(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailed(_))
    }

    /// Check if the caller's identity or relation to the target was rejected
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotAuthorized
                | Self::AlreadyAuthorized
                | Self::InvalidCredentials
                | Self::ResourceInaccessible
                | Self::RightsViolation
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let reason = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map_or_else(|| "is invalid".to_string(), ToString::to_string);
                format!("{field} {reason}")
            })
            .collect();
        fields.sort();
        Self::ValidationFailed(fields.join(", "))
    }
}

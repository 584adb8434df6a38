//! Error handling utilities for repositories

use social_core::error::DomainError;
use sqlx::Error as SqlxError;

/// SQLSTATE raised when a serializable transaction loses a conflict
const SERIALIZATION_FAILURE: &str = "40001";

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.code().as_deref() == Some(SERIALIZATION_FAILURE) {
            return DomainError::conflict("concurrent update, try again");
        }
    }
    match e {
        SqlxError::RowNotFound => DomainError::DoesNotExist("record"),
        other => DomainError::Database(other.to_string()),
    }
}

/// Map constraint violations of a write: unique → `Conflict(on_unique)`,
/// foreign key → `DoesNotExist(missing)`, anything else → [`map_db_error`]
pub fn map_write_error(e: SqlxError, on_unique: &str, missing: &'static str) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return DomainError::conflict(on_unique);
        }
        if db_err.is_foreign_key_violation() {
            return DomainError::DoesNotExist(missing);
        }
    }
    map_db_error(e)
}

/// Turn an affected-row count into `DoesNotExist` when nothing matched
pub fn expect_affected(rows: u64, what: &'static str) -> Result<(), DomainError> {
    if rows == 0 {
        Err(DomainError::DoesNotExist(what))
    } else {
        Ok(())
    }
}

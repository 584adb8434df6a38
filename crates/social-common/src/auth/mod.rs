//! Identity tokens and password hashing

mod jwt;
mod password;

use uuid::Uuid;

use crate::error::AppError;

pub use jwt::{Claims, JwtAuthorizer};
pub use password::{hash_password, verify_password};

/// Verifies and issues opaque identity tokens
pub trait Authorizer: Send + Sync {
    /// Resolve a token to the user id it was issued for
    fn verify(&self, token: &str) -> Result<Uuid, AppError>;

    /// Issue a token for a user; the token expires after the configured lifetime
    fn generate_token(&self, user_id: Uuid) -> Result<String, AppError>;
}

//! Validated input forms accepted by the managers and facades
//!
//! All forms implement `Deserialize` and `Validate`; the service layer calls
//! `validate()` itself, so a form built in code is checked the same way as one
//! decoded from a request body.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// User Forms
// ============================================================================

/// Account registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserRegistration {
    #[validate(length(min = 5, max = 20, message = "must be 5-20 characters"))]
    pub username: String,

    #[validate(length(min = 5, max = 20, message = "must be 5-20 characters"))]
    pub password: String,
}

/// Login with username and password
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserLogin {
    #[validate(length(min = 5, max = 20, message = "must be 5-20 characters"))]
    pub username: String,

    #[validate(length(min = 5, max = 20, message = "must be 5-20 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(length(min = 5, max = 20, message = "must be 5-20 characters"))]
    pub username: String,
}

// ============================================================================
// Chat Forms
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChatCreation {
    #[validate(length(min = 5, max = 230, message = "must be 5-230 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 400, message = "must be at most 400 characters"))]
    pub description: String,
}

// ============================================================================
// Message Forms
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessage {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub payload: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MessageUpdate {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub payload: String,
}

impl UserRegistration {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl UserLogin {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl ChatCreation {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

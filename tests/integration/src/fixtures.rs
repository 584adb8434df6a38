//! Test fixtures and data generators
//!
//! Provides reusable request bodies and the response shapes the tests decode.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

pub const TEST_PASSWORD: &str = "secret123";

/// Registration request
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

impl RegisterRequest {
    /// A fresh username within the 5-20 character limit
    pub fn unique() -> Self {
        Self {
            username: format!("user{}", unique_suffix()),
            password: TEST_PASSWORD.to_string(),
        }
    }
}

/// Login request
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            username: reg.username.clone(),
            password: reg.password.clone(),
        }
    }
}

/// Profile update request
#[derive(Debug, Serialize)]
pub struct UpdateUserRequest {
    pub username: String,
}

/// Auth response
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

/// User response
#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
}

/// Friend request body
#[derive(Debug, Serialize)]
pub struct CreateFriendRequest {
    pub user_id: Uuid,
}

/// Friend request response
#[derive(Debug, Deserialize)]
pub struct FriendRequestResponse {
    pub id: Uuid,
    pub from_id: Uuid,
    pub to_id: Uuid,
}

/// Create chat request
#[derive(Debug, Serialize)]
pub struct CreateChatRequest {
    pub name: String,
    pub description: String,
}

impl CreateChatRequest {
    pub fn unique() -> Self {
        Self {
            name: format!("Test Chat {}", unique_suffix()),
            description: "A test chat".to_string(),
        }
    }
}

/// Chat response
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
}

/// Add member request
#[derive(Debug, Serialize)]
pub struct AddMemberRequest {
    pub user_id: Uuid,
}

/// Member response
#[derive(Debug, Deserialize)]
pub struct MemberResponse {
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub status: i32,
}

/// Message body for sending and editing
#[derive(Debug, Serialize)]
pub struct MessageRequest {
    pub payload: String,
}

impl MessageRequest {
    pub fn simple(payload: &str) -> Self {
        Self {
            payload: payload.to_string(),
        }
    }
}

/// Message response
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub payload: String,
    pub edited: bool,
}

/// One page of a list
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub offset: i64,
    pub count: i64,
    pub total: i64,
}

/// Error response
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use serde::Serialize;
use social_core::entities;
use social_core::MemberStatus;
use uuid::Uuid;

// ============================================================================
// Common Response Types
// ============================================================================

/// One page of a list, with the total size of the list
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub offset: i64,
    pub count: i64,
    pub total: i64,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>, offset: i64, total: i64) -> Self {
        Self {
            count: data.len() as i64,
            data,
            offset,
            total,
        }
    }
}

// ============================================================================
// User Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
}

impl UserResponse {
    pub fn new(id: Uuid, username: String) -> Self {
        Self { id, username }
    }
}

/// Returned by register and login; the token is also set as a cookie
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn new(token: String, expires_in: i64, user: UserResponse) -> Self {
        Self {
            token,
            token_type: "Bearer",
            expires_in,
            user,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FriendRequestResponse {
    pub id: Uuid,
    pub from_id: Uuid,
    pub to_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<entities::FriendRequest> for FriendRequestResponse {
    fn from(request: entities::FriendRequest) -> Self {
        Self {
            id: request.id,
            from_id: request.from_id,
            to_id: request.to_id,
            created_at: request.created_at,
        }
    }
}

// ============================================================================
// Chat Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
}

impl From<entities::Chat> for ChatResponse {
    fn from(chat: entities::Chat) -> Self {
        Self {
            id: chat.id,
            name: chat.name,
            description: chat.description,
            owner_id: chat.owner_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub status: MemberStatus,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub payload: String,
    pub created_at: DateTime<Utc>,
    pub last_update: DateTime<Utc>,
    pub edited: bool,
}

impl From<entities::Message> for MessageResponse {
    fn from(message: entities::Message) -> Self {
        Self {
            edited: message.is_edited(),
            id: message.id,
            chat_id: message.chat_id,
            user_id: message.user_id,
            payload: message.payload,
            created_at: message.created_at,
            last_update: message.last_update,
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub storage: String,
}

impl ReadinessResponse {
    pub fn ready(storage_healthy: bool) -> Self {
        Self {
            status: if storage_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            storage: if storage_healthy { "healthy" } else { "unhealthy" }.to_string(),
        }
    }
}

//! API Integration Tests
//!
//! Every test starts its own server on an ephemeral port with in-memory
//! storage, so no external services are required.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use std::time::Duration;

use futures::StreamExt;
use integration_tests::{assert_error, assert_json, assert_status, fixtures::*, TestServer};
use reqwest::{header, StatusCode};
use serde_json::json;
use uuid::Uuid;

/// Register a fresh user and return the auth response
async fn register(server: &TestServer) -> AuthResponse {
    let request = RegisterRequest::unique();
    let response = server.post("/auth/register", &request).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

/// Register two users and make them members of a chat owned by the first
async fn chat_with_member(server: &TestServer) -> (AuthResponse, AuthResponse, ChatResponse) {
    let owner = register(server).await;
    let member = register(server).await;

    let response = server
        .post_auth("/chats", &owner.token, &CreateChatRequest::unique())
        .await
        .unwrap();
    let chat: ChatResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            &format!("/chats/{}/members", chat.id),
            &owner.token,
            &AddMemberRequest {
                user_id: member.user.id,
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    (owner, member, chat)
}

async fn send_message(server: &TestServer, token: &str, chat_id: Uuid, payload: &str) -> MessageResponse {
    let response = server
        .post_auth(
            &format!("/chats/{chat_id}/messages"),
            token,
            &MessageRequest::simple(payload),
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn send_friend_request(server: &TestServer, token: &str, to: Uuid) -> FriendRequestResponse {
    let response = server
        .post_auth(
            "/users/@me/friend-requests",
            token,
            &CreateFriendRequest { user_id: to },
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get_raw("/health").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get_raw("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_user() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/auth/register", &request).await.unwrap();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
        .expect("session cookie");
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(auth.user.username, request.username);
    assert_eq!(auth.token_type, "Bearer");
    assert!(auth.expires_in > 0);
    assert!(cookie.starts_with(&format!("auth_token={}", auth.token)));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/auth/register", &request).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server.post("/auth/register", &request).await.unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "CONFLICT");
}

#[tokio::test]
async fn test_register_validation() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest {
        username: "bob".to_string(),
        password: TEST_PASSWORD.to_string(),
    };

    let response = server.post("/auth/register", &request).await.unwrap();
    let body: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "VALIDATION_FAILED");
    assert!(body.error.message.contains("username"));
}

#[tokio::test]
async fn test_register_malformed_body() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .post("/auth/register", &json!({ "username": "someone" }))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_BODY");
}

#[tokio::test]
async fn test_register_while_authenticated() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;

    let response = server
        .post_auth("/auth/register", &auth.token, &RegisterRequest::unique())
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "ALREADY_AUTHORIZED");
}

#[tokio::test]
async fn test_login() {
    let server = TestServer::start().await.expect("Failed to start server");

    let register_req = RegisterRequest::unique();
    let response = server.post("/auth/register", &register_req).await.unwrap();
    let registered: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let login_req = LoginRequest::from_register(&register_req);
    let response = server.post("/auth/login", &login_req).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(auth.user.id, registered.user.id);
    assert_eq!(auth.user.username, register_req.username);
    assert!(!auth.token.is_empty());
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = TestServer::start().await.expect("Failed to start server");
    let register_req = RegisterRequest::unique();
    server.post("/auth/register", &register_req).await.unwrap();

    // Wrong password and unknown user fail the same way
    let wrong_password = LoginRequest {
        username: register_req.username.clone(),
        password: "wrongpass".to_string(),
    };
    let response = server.post("/auth/login", &wrong_password).await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_CREDENTIALS");

    let unknown = LoginRequest {
        username: "nobody1".to_string(),
        password: TEST_PASSWORD.to_string(),
    };
    let response = server.post("/auth/login", &unknown).await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;

    let response = server
        .post_empty_auth("/auth/logout", &auth.token)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("removal cookie");
    assert!(cookie.starts_with("auth_token="));
    assert!(cookie.contains("Max-Age=0"));
}

// ============================================================================
// User Tests
// ============================================================================

#[tokio::test]
async fn test_get_current_user() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;

    let response = server.get_auth("/users/@me", &auth.token).await.unwrap();
    let user: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(user.id, auth.user.id);
    assert_eq!(user.username, auth.user.username);
}

#[tokio::test]
async fn test_cookie_authentication() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;

    let response = server
        .client
        .get(server.api_url("/users/@me"))
        .header(header::COOKIE, format!("auth_token={}", auth.token))
        .send()
        .await
        .unwrap();
    let user: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user.id, auth.user.id);
}

#[tokio::test]
async fn test_unauthenticated_request() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/users/@me").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "NOT_AUTHORIZED");

    // A token that does not verify leaves the caller anonymous
    let response = server.get_auth("/users/@me", "not-a-token").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "NOT_AUTHORIZED");
}

#[tokio::test]
async fn test_update_current_user() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;
    let new_name = format!("renamed{}", unique_suffix());

    let response = server
        .patch_auth(
            "/users/@me",
            &auth.token,
            &UpdateUserRequest {
                username: new_name.clone(),
            },
        )
        .await
        .unwrap();
    let user: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user.username, new_name);

    // The new name is the login name from now on
    let response = server
        .post(
            "/auth/login",
            &LoginRequest {
                username: new_name,
                password: TEST_PASSWORD.to_string(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_get_user_by_id() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = register(&server).await;
    let bob = register(&server).await;

    let response = server
        .get_auth(&format!("/users/{}", bob.user.id), &alice.token)
        .await
        .unwrap();
    let user: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user.username, bob.user.username);

    let response = server
        .get_auth(&format!("/users/{}", Uuid::new_v4()), &alice.token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "DOES_NOT_EXIST");
}

#[tokio::test]
async fn test_invalid_path_parameter() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;

    let response = server.get_auth("/users/not-a-uuid", &auth.token).await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_PATH_PARAMETER");
}

#[tokio::test]
async fn test_delete_current_user() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;

    let response = server.delete_auth("/users/@me", &auth.token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    // The token still verifies but names nobody
    let response = server.get_auth("/users/@me", &auth.token).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Friend Tests
// ============================================================================

#[tokio::test]
async fn test_friend_request_flow() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = register(&server).await;
    let bob = register(&server).await;

    let response = server
        .post_auth(
            "/users/@me/friend-requests",
            &alice.token,
            &CreateFriendRequest {
                user_id: bob.user.id,
            },
        )
        .await
        .unwrap();
    let request: FriendRequestResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(request.from_id, alice.user.id);
    assert_eq!(request.to_id, bob.user.id);

    let response = server
        .get_auth("/users/@me/friend-requests/incoming", &bob.token)
        .await
        .unwrap();
    let incoming: ListResponse<FriendRequestResponse> =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(incoming.total, 1);
    assert_eq!(incoming.data[0].id, request.id);

    let response = server
        .get_auth("/users/@me/friend-requests/outgoing", &alice.token)
        .await
        .unwrap();
    let outgoing: ListResponse<FriendRequestResponse> =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(outgoing.data.len(), 1);

    let response = server
        .post_empty_auth(&format!("/friend-requests/{}/accept", request.id), &bob.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    for (me, friend) in [(&alice, &bob), (&bob, &alice)] {
        let response = server.get_auth("/users/@me/friends", &me.token).await.unwrap();
        let friends: ListResponse<UserResponse> =
            assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(friends.total, 1);
        assert_eq!(friends.data[0].id, friend.user.id);
    }

    // The request is gone once accepted
    let response = server
        .get_auth("/users/@me/friend-requests/incoming", &bob.token)
        .await
        .unwrap();
    let incoming: ListResponse<FriendRequestResponse> =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(incoming.total, 0);

    let response = server
        .delete_auth(&format!("/users/@me/friends/{}", alice.user.id), &bob.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get_auth("/users/@me/friends", &alice.token).await.unwrap();
    let friends: ListResponse<UserResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(friends.data.is_empty());
}

#[tokio::test]
async fn test_friend_request_conflicts() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = register(&server).await;
    let bob = register(&server).await;

    let to_self = server
        .post_auth(
            "/users/@me/friend-requests",
            &alice.token,
            &CreateFriendRequest {
                user_id: alice.user.id,
            },
        )
        .await
        .unwrap();
    assert_error(to_self, StatusCode::CONFLICT).await.unwrap();

    let first = server
        .post_auth(
            "/users/@me/friend-requests",
            &alice.token,
            &CreateFriendRequest {
                user_id: bob.user.id,
            },
        )
        .await
        .unwrap();
    assert_status(first, StatusCode::CREATED).await.unwrap();

    // The inverse direction conflicts with the pending request too
    let inverse = server
        .post_auth(
            "/users/@me/friend-requests",
            &bob.token,
            &CreateFriendRequest {
                user_id: alice.user.id,
            },
        )
        .await
        .unwrap();
    assert_error(inverse, StatusCode::CONFLICT).await.unwrap();

    let unknown = server
        .post_auth(
            "/users/@me/friend-requests",
            &alice.token,
            &CreateFriendRequest {
                user_id: Uuid::new_v4(),
            },
        )
        .await
        .unwrap();
    assert_error(unknown, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_friend_request_decline_and_withdraw() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = register(&server).await;
    let bob = register(&server).await;

    let request = send_friend_request(&server, &alice.token, bob.user.id).await;

    // Only the recipient may decline
    let response = server
        .post_empty_auth(&format!("/friend-requests/{}/decline", request.id), &alice.token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "RIGHTS_VIOLATION");

    let response = server
        .post_empty_auth(&format!("/friend-requests/{}/decline", request.id), &bob.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    // A declined request can be sent again, then withdrawn by its sender
    let request = send_friend_request(&server, &alice.token, bob.user.id).await;
    let response = server
        .delete_auth(&format!("/friend-requests/{}", request.id), &alice.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .post_empty_auth(&format!("/friend-requests/{}/accept", request.id), &bob.token)
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Chat Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_get_chat() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;
    let request = CreateChatRequest::unique();

    let response = server.post_auth("/chats", &auth.token, &request).await.unwrap();
    let chat: ChatResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(chat.name, request.name);
    assert_eq!(chat.description, request.description);
    assert_eq!(chat.owner_id, auth.user.id);

    let response = server
        .get_auth(&format!("/chats/{}", chat.id), &auth.token)
        .await
        .unwrap();
    let fetched: ChatResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(fetched.id, chat.id);

    let response = server.get_auth("/users/@me/chats", &auth.token).await.unwrap();
    let chats: ListResponse<ChatResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(chats.total, 1);
    assert_eq!(chats.data[0].id, chat.id);
}

#[tokio::test]
async fn test_create_chat_validation() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;

    let response = server
        .post_auth(
            "/chats",
            &auth.token,
            &CreateChatRequest {
                name: "tiny".to_string(),
                description: String::new(),
            },
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_chat_members() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (owner, member, chat) = chat_with_member(&server).await;

    let response = server
        .get_auth(&format!("/chats/{}/members", chat.id), &member.token)
        .await
        .unwrap();
    let members: ListResponse<MemberResponse> =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(members.total, 2);

    let owner_entry = members
        .data
        .iter()
        .find(|m| m.user_id == owner.user.id)
        .expect("owner listed");
    assert_eq!(owner_entry.status, 1);
    assert_eq!(owner_entry.chat_id, chat.id);

    let member_entry = members
        .data
        .iter()
        .find(|m| m.user_id == member.user.id)
        .expect("member listed");
    assert_eq!(member_entry.status, 0);

    // Adding the same user twice conflicts
    let response = server
        .post_auth(
            &format!("/chats/{}/members", chat.id),
            &owner.token,
            &AddMemberRequest {
                user_id: member.user.id,
            },
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_non_member_is_locked_out() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, _, chat) = chat_with_member(&server).await;
    let outsider = register(&server).await;

    let response = server
        .get_auth(&format!("/chats/{}", chat.id), &outsider.token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "RESOURCE_INACCESSIBLE");

    let response = server
        .post_auth(
            &format!("/chats/{}/messages", chat.id),
            &outsider.token,
            &MessageRequest::simple("let me in"),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_remove_member() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (owner, member, chat) = chat_with_member(&server).await;

    let response = server
        .delete_auth(
            &format!("/chats/{}/members/{}", chat.id, member.user.id),
            &owner.token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth(&format!("/chats/{}", chat.id), &member.token)
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_delete_chat() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (owner, member, chat) = chat_with_member(&server).await;

    let response = server
        .delete_auth(&format!("/chats/{}", chat.id), &member.token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "RIGHTS_VIOLATION");

    let response = server
        .delete_auth(&format!("/chats/{}", chat.id), &owner.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth(&format!("/chats/{}", chat.id), &owner.token)
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Message Tests
// ============================================================================

#[tokio::test]
async fn test_messages_newest_first_with_pagination() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (owner, member, chat) = chat_with_member(&server).await;

    for (i, token) in [&owner.token, &member.token, &owner.token].into_iter().enumerate() {
        send_message(&server, token, chat.id, &format!("message {i}")).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let response = server
        .get_auth(
            &format!("/chats/{}/messages?offset=0&count=2", chat.id),
            &member.token,
        )
        .await
        .unwrap();
    let page: ListResponse<MessageResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.count, 2);
    assert_eq!(page.offset, 0);
    assert_eq!(page.data[0].payload, "message 2");
    assert_eq!(page.data[1].payload, "message 1");

    let response = server
        .get_auth(
            &format!("/chats/{}/messages?offset=2&count=2", chat.id),
            &member.token,
        )
        .await
        .unwrap();
    let page: ListResponse<MessageResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].payload, "message 0");
}

#[tokio::test]
async fn test_invalid_pagination() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (owner, _, chat) = chat_with_member(&server).await;

    for query in ["offset=-1", "count=0", "count=abc"] {
        let response = server
            .get_auth(&format!("/chats/{}/messages?{query}", chat.id), &owner.token)
            .await
            .unwrap();
        let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
        assert_eq!(code, "INVALID_QUERY_PARAMETER", "query {query}");
    }
}

#[tokio::test]
async fn test_message_author_controls() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (owner, member, chat) = chat_with_member(&server).await;
    let message = send_message(&server, &member.token, chat.id, "first draft").await;
    assert_eq!(message.user_id, member.user.id);
    assert_eq!(message.chat_id, chat.id);
    assert!(!message.edited);

    // Other members cannot touch it
    let response = server
        .patch_auth(
            &format!("/messages/{}", message.id),
            &owner.token,
            &MessageRequest::simple("hijacked"),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "RESOURCE_INACCESSIBLE");

    tokio::time::sleep(Duration::from_millis(5)).await;
    let response = server
        .patch_auth(
            &format!("/messages/{}", message.id),
            &member.token,
            &MessageRequest::simple("final text"),
        )
        .await
        .unwrap();
    let updated: MessageResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.payload, "final text");
    assert!(updated.edited);

    let response = server
        .delete_auth(&format!("/messages/{}", message.id), &member.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth(&format!("/messages/{}", message.id), &member.token)
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_empty_message_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (owner, _, chat) = chat_with_member(&server).await;

    let response = server
        .post_auth(
            &format!("/chats/{}/messages", chat.id),
            &owner.token,
            &MessageRequest::simple(""),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Event Feed Tests
// ============================================================================

/// Read the SSE body until `needle` shows up
async fn read_until(response: reqwest::Response, needle: &str) -> String {
    let mut body = response.bytes_stream();
    let mut seen = String::new();

    let found = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(chunk) = body.next().await {
            seen.push_str(&String::from_utf8_lossy(&chunk.unwrap()));
            if seen.contains(needle) {
                return true;
            }
        }
        false
    })
    .await
    .unwrap_or(false);

    assert!(found, "never saw {needle:?} in {seen:?}");
    seen
}

#[tokio::test]
async fn test_event_feed_requires_auth() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/events").await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_event_feed_delivers_chat_messages() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (owner, member, chat) = chat_with_member(&server).await;

    let feed = server.get_auth("/events", &member.token).await.unwrap();
    assert_eq!(feed.status(), StatusCode::OK);

    let message = send_message(&server, &owner.token, chat.id, "hello feed").await;

    let seen = read_until(feed, "event: new_message").await;
    assert!(seen.contains(&message.id.to_string()));
    assert!(seen.contains(&chat.id.to_string()));
}

#[tokio::test]
async fn test_event_feed_filters_foreign_chats() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (owner, _, chat) = chat_with_member(&server).await;
    let outsider = register(&server).await;
    let alice = register(&server).await;

    let feed = server.get_auth("/events", &outsider.token).await.unwrap();
    assert_eq!(feed.status(), StatusCode::OK);

    // Traffic in a chat the outsider is not in, then an event naming them
    send_message(&server, &owner.token, chat.id, "private").await;
    let response = server
        .post_auth(
            "/users/@me/friend-requests",
            &alice.token,
            &CreateFriendRequest {
                user_id: outsider.user.id,
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let seen = read_until(feed, "event: friend_request").await;
    assert!(!seen.contains("new_message"));
}

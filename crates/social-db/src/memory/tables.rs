//! In-memory tables with the same constraints as the SQL schema

use std::collections::{BTreeMap, BTreeSet, HashMap};

use uuid::Uuid;

use social_core::entities::{Chat, ChatMember, FriendConnection, FriendRequest, Message, User};
use social_core::error::DomainError;
use social_core::traits::{Page, RepoResult};

/// The whole data set. Cloned wholesale when a transaction begins.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    users: BTreeMap<Uuid, User>,
    usernames: HashMap<String, Uuid>,
    chats: HashMap<Uuid, Chat>,
    /// Keyed by (chat_id, user_id)
    members: BTreeMap<(Uuid, Uuid), ChatMember>,
    messages: HashMap<Uuid, Message>,
    requests: HashMap<Uuid, FriendRequest>,
    /// Normalized (smaller id, larger id)
    connections: BTreeSet<(Uuid, Uuid)>,
}

fn window<T>(items: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    items
        .skip(usize::try_from(page.offset).unwrap_or(0))
        .take(usize::try_from(page.count).unwrap_or(0))
        .collect()
}

fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn found(exists: bool, what: &'static str) -> RepoResult<()> {
    if exists {
        Ok(())
    } else {
        Err(DomainError::DoesNotExist(what))
    }
}

impl Tables {
    // ========================================================================
    // Users
    // ========================================================================

    pub fn create_user(&mut self, user: &User) -> RepoResult<()> {
        if self.users.contains_key(&user.id) || self.usernames.contains_key(&user.username) {
            return Err(DomainError::conflict("username is already taken"));
        }
        self.usernames.insert(user.username.clone(), user.id);
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    pub fn get_user(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).cloned()
    }

    pub fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.usernames
            .get(username)
            .and_then(|id| self.users.get(id))
            .cloned()
    }

    pub fn update_user(&mut self, user: &User) -> RepoResult<()> {
        let Some(current) = self.users.get(&user.id) else {
            return Err(DomainError::DoesNotExist("user"));
        };
        if let Some(&owner) = self.usernames.get(&user.username) {
            if owner != user.id {
                return Err(DomainError::conflict("username is already taken"));
            }
        }
        self.usernames.remove(&current.username);
        self.usernames.insert(user.username.clone(), user.id);
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    pub fn delete_user(&mut self, id: Uuid) -> RepoResult<()> {
        let user = self.users.remove(&id).ok_or(DomainError::DoesNotExist("user"))?;
        self.usernames.remove(&user.username);

        let owned: Vec<Uuid> = self
            .chats
            .values()
            .filter(|chat| chat.owner_id == id)
            .map(|chat| chat.id)
            .collect();
        for chat_id in owned {
            self.remove_chat(chat_id);
        }

        self.members.retain(|_, member| member.user_id != id);
        self.messages.retain(|_, message| message.user_id != id);
        self.requests.retain(|_, request| !request.involves(id));
        self.connections.retain(|&(a, b)| a != id && b != id);
        Ok(())
    }

    // ========================================================================
    // Friend connections
    // ========================================================================

    pub fn create_friend_connection(&mut self, user_id: Uuid, friend_id: Uuid) -> RepoResult<()> {
        if user_id == friend_id {
            return Err(DomainError::validation("a user cannot befriend themselves"));
        }
        found(
            self.users.contains_key(&user_id) && self.users.contains_key(&friend_id),
            "user",
        )?;
        if !self
            .connections
            .insert(FriendConnection::new(user_id, friend_id).key())
        {
            return Err(DomainError::conflict("users are already friends"));
        }
        Ok(())
    }

    pub fn delete_friend_connection(&mut self, user_id: Uuid, friend_id: Uuid) -> RepoResult<()> {
        let removed = self
            .connections
            .remove(&FriendConnection::new(user_id, friend_id).key());
        found(removed, "friend connection")
    }

    pub fn friend_connection_exists(&self, user_id: Uuid, friend_id: Uuid) -> bool {
        self.connections
            .contains(&FriendConnection::new(user_id, friend_id).key())
    }

    fn friend_ids(&self, user_id: Uuid) -> impl Iterator<Item = Uuid> + '_ {
        self.connections.iter().filter_map(move |&(a, b)| {
            FriendConnection::new(a, b).other(user_id)
        })
    }

    pub fn get_user_friends(&self, user_id: Uuid, page: Page) -> Vec<User> {
        let mut ids: Vec<Uuid> = self.friend_ids(user_id).collect();
        ids.sort_unstable();
        window(
            ids.into_iter().filter_map(|id| self.users.get(&id).cloned()),
            page,
        )
    }

    pub fn count_user_friends(&self, user_id: Uuid) -> i64 {
        count(self.friend_ids(user_id).count())
    }

    // ========================================================================
    // Friend requests
    // ========================================================================

    pub fn create_friend_request(&mut self, request: &FriendRequest) -> RepoResult<()> {
        if request.from_id == request.to_id {
            return Err(DomainError::validation("a user cannot befriend themselves"));
        }
        found(
            self.users.contains_key(&request.from_id) && self.users.contains_key(&request.to_id),
            "user",
        )?;
        let pair_taken = self.requests.contains_key(&request.id)
            || self
                .requests
                .values()
                .any(|r| r.involves(request.from_id) && r.involves(request.to_id));
        if pair_taken {
            return Err(DomainError::conflict("friend request already exists"));
        }
        self.requests.insert(request.id, request.clone());
        Ok(())
    }

    pub fn get_friend_request(&self, id: Uuid) -> Option<FriendRequest> {
        self.requests.get(&id).cloned()
    }

    pub fn find_friend_request(&self, from_id: Uuid, to_id: Uuid) -> Option<FriendRequest> {
        self.requests
            .values()
            .find(|r| r.from_id == from_id && r.to_id == to_id)
            .cloned()
    }

    pub fn delete_friend_request(&mut self, id: Uuid) -> RepoResult<()> {
        found(self.requests.remove(&id).is_some(), "friend request")
    }

    fn requests_where(&self, pred: impl Fn(&FriendRequest) -> bool, page: Page) -> Vec<FriendRequest> {
        let mut requests: Vec<&FriendRequest> = self.requests.values().filter(|r| pred(r)).collect();
        requests.sort_by_key(|r| (r.created_at, r.id));
        window(requests.into_iter().cloned(), page)
    }

    pub fn get_incoming_friend_requests(&self, user_id: Uuid, page: Page) -> Vec<FriendRequest> {
        self.requests_where(|r| r.to_id == user_id, page)
    }

    pub fn get_outgoing_friend_requests(&self, user_id: Uuid, page: Page) -> Vec<FriendRequest> {
        self.requests_where(|r| r.from_id == user_id, page)
    }

    pub fn count_incoming_friend_requests(&self, user_id: Uuid) -> i64 {
        count(self.requests.values().filter(|r| r.to_id == user_id).count())
    }

    pub fn count_outgoing_friend_requests(&self, user_id: Uuid) -> i64 {
        count(self.requests.values().filter(|r| r.from_id == user_id).count())
    }

    // ========================================================================
    // Chats
    // ========================================================================

    pub fn create_chat(&mut self, chat: &Chat) -> RepoResult<()> {
        found(self.users.contains_key(&chat.owner_id), "user")?;
        if self.chats.contains_key(&chat.id) {
            return Err(DomainError::conflict("chat already exists"));
        }
        self.chats.insert(chat.id, chat.clone());
        Ok(())
    }

    pub fn get_chat(&self, id: Uuid) -> Option<Chat> {
        self.chats.get(&id).cloned()
    }

    pub fn delete_chat(&mut self, id: Uuid) -> RepoResult<()> {
        found(self.remove_chat(id), "chat")
    }

    fn remove_chat(&mut self, id: Uuid) -> bool {
        if self.chats.remove(&id).is_none() {
            return false;
        }
        self.members.retain(|&(chat_id, _), _| chat_id != id);
        self.messages.retain(|_, message| message.chat_id != id);
        true
    }

    // ========================================================================
    // Chat members
    // ========================================================================

    pub fn create_chat_member(&mut self, member: &ChatMember) -> RepoResult<()> {
        found(
            self.users.contains_key(&member.user_id) && self.chats.contains_key(&member.chat_id),
            "user or chat",
        )?;
        let key = (member.chat_id, member.user_id);
        if self.members.contains_key(&key) {
            return Err(DomainError::conflict("user is already a member of this chat"));
        }
        self.members.insert(key, member.clone());
        Ok(())
    }

    pub fn get_chat_member(&self, user_id: Uuid, chat_id: Uuid) -> Option<ChatMember> {
        self.members.get(&(chat_id, user_id)).cloned()
    }

    pub fn delete_chat_member(&mut self, user_id: Uuid, chat_id: Uuid) -> RepoResult<()> {
        found(
            self.members.remove(&(chat_id, user_id)).is_some(),
            "chat member",
        )?;
        self.messages
            .retain(|_, m| !(m.chat_id == chat_id && m.user_id == user_id));
        Ok(())
    }

    pub fn get_chat_members(&self, chat_id: Uuid, page: Page) -> Vec<ChatMember> {
        window(
            self.members
                .values()
                .filter(|m| m.chat_id == chat_id)
                .cloned(),
            page,
        )
    }

    pub fn count_chat_members(&self, chat_id: Uuid) -> i64 {
        count(self.members.values().filter(|m| m.chat_id == chat_id).count())
    }

    pub fn get_user_chats(&self, user_id: Uuid, page: Page) -> Vec<ChatMember> {
        window(
            self.members
                .values()
                .filter(|m| m.user_id == user_id)
                .cloned(),
            page,
        )
    }

    pub fn count_user_chats(&self, user_id: Uuid) -> i64 {
        count(self.members.values().filter(|m| m.user_id == user_id).count())
    }

    // ========================================================================
    // Messages
    // ========================================================================

    pub fn create_message(&mut self, message: &Message) -> RepoResult<()> {
        found(
            self.members
                .contains_key(&(message.chat_id, message.user_id)),
            "chat member",
        )?;
        if self.messages.contains_key(&message.id) {
            return Err(DomainError::conflict("message already exists"));
        }
        self.messages.insert(message.id, message.clone());
        Ok(())
    }

    pub fn get_message(&self, id: Uuid) -> Option<Message> {
        self.messages.get(&id).cloned()
    }

    pub fn update_message(&mut self, message: &Message) -> RepoResult<()> {
        let stored = self
            .messages
            .get_mut(&message.id)
            .ok_or(DomainError::DoesNotExist("message"))?;
        stored.payload = message.payload.clone();
        stored.last_update = message.last_update;
        Ok(())
    }

    pub fn delete_message(&mut self, id: Uuid) -> RepoResult<()> {
        found(self.messages.remove(&id).is_some(), "message")
    }

    pub fn get_chat_messages(&self, chat_id: Uuid, page: Page) -> Vec<Message> {
        let mut messages: Vec<&Message> = self
            .messages
            .values()
            .filter(|m| m.chat_id == chat_id)
            .collect();
        messages.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        window(messages.into_iter().cloned(), page)
    }

    pub fn count_chat_messages(&self, chat_id: Uuid) -> i64 {
        count(self.messages.values().filter(|m| m.chat_id == chat_id).count())
    }
}

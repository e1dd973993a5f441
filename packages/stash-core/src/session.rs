//! Session lookup for simple login flows.
//!
//! A `SessionStore` is owned by the application and shared by reference
//! (typically inside an `Arc`) with request handlers. Both maps sit behind
//! their own `RwLock`.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StashError};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_name: String,
    pub password_hash: String,
    pub first: String,
    pub last: String,
}

/// Session id to user name, and user name to user.
#[derive(Debug, Default)]
pub struct SessionStore {
    /// Session id -> user name
    sessions: RwLock<HashMap<String, String>>,
    /// User name -> user
    users: RwLock<HashMap<String, User>>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces a user. Returns the previous entry, if any.
    pub fn register_user(&self, user: User) -> Result<Option<User>> {
        let mut users = self.users.write().map_err(|_| StashError::LockPoisoned)?;
        Ok(users.insert(user.user_name.clone(), user))
    }

    /// Removes a user. Sessions pointing at them stop counting as logged in.
    pub fn remove_user(&self, user_name: &str) -> Result<Option<User>> {
        let mut users = self.users.write().map_err(|_| StashError::LockPoisoned)?;
        Ok(users.remove(user_name))
    }

    /// Binds `session_id` to `user_name`, replacing any earlier binding.
    pub fn start_session(&self, session_id: &str, user_name: &str) -> Result<()> {
        let mut sessions = self.sessions.write().map_err(|_| StashError::LockPoisoned)?;
        sessions.insert(session_id.to_string(), user_name.to_string());
        tracing::debug!("Session started for user {}", user_name);
        Ok(())
    }

    /// Drops a session. Returns true if it existed.
    pub fn end_session(&self, session_id: &str) -> Result<bool> {
        let mut sessions = self.sessions.write().map_err(|_| StashError::LockPoisoned)?;
        Ok(sessions.remove(session_id).is_some())
    }

    /// Returns the user behind a session, if both still exist.
    pub fn user_for_session(&self, session_id: &str) -> Result<Option<User>> {
        let user_name = {
            let sessions = self.sessions.read().map_err(|_| StashError::LockPoisoned)?;
            match sessions.get(session_id) {
                Some(name) => name.clone(),
                None => return Ok(None),
            }
        };
        let users = self.users.read().map_err(|_| StashError::LockPoisoned)?;
        Ok(users.get(&user_name).cloned())
    }

    /// True when the session cookie value maps to an existing user.
    ///
    /// `None` (no cookie) is never logged in.
    pub fn is_logged_in(&self, session_cookie: Option<&str>) -> Result<bool> {
        match session_cookie {
            Some(session_id) => Ok(self.user_for_session(session_id)?.is_some()),
            None => Ok(false),
        }
    }
}

/// Client address: the `X-Forwarded-For` value when set, else the remote address.
pub fn client_ip<'a>(forwarded_for: Option<&'a str>, remote_addr: &'a str) -> &'a str {
    match forwarded_for.map(str::trim) {
        Some(forwarded) if !forwarded.is_empty() => forwarded,
        _ => remote_addr,
    }
}

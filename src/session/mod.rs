pub mod store;

use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BlogError, Result};

pub use store::{KeyValueStore, MemoryStore, SqliteStore};

pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "jwt";

pub const ANONYMOUS: &str = "Anonymous";

/// The stored `user` object. Whatever else the login flow put in it is kept.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
}

impl Session {
    pub fn author(&self) -> &str {
        self.user
            .as_ref()
            .and_then(User::display_name)
            .unwrap_or(ANONYMOUS)
    }
}

/// Explicit access to the session, handed to views when they are built.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn KeyValueStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn has_user(&self) -> Result<bool> {
        Ok(self.store.get(USER_KEY)?.is_some())
    }

    pub fn read(&self) -> Result<Session> {
        let user = match self.store.get(USER_KEY)? {
            Some(raw) => Some(
                serde_json::from_str::<User>(&raw)
                    .map_err(|e| BlogError::Session(format!("stored user is not valid: {}", e)))?,
            ),
            None => None,
        };
        let token = self.store.get(TOKEN_KEY)?;
        Ok(Session { user, token })
    }

    pub fn store(&self, user: &User, token: &str) -> Result<()> {
        self.store.set(USER_KEY, &serde_json::to_string(user)?)?;
        self.store.set(TOKEN_KEY, token)?;
        debug!("session stored for {}", user.display_name().unwrap_or(ANONYMOUS));
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(USER_KEY)?;
        self.store.remove(TOKEN_KEY)?;
        debug!("session cleared");
        Ok(())
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext").finish_non_exhaustive()
    }
}

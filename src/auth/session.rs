use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::Storage;

pub const AUTH_KEY: &str = "auth_user";

/// The stored session flag. Its presence means "signed in".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<u64>,
}

impl AuthUser {
    pub fn new(username: impl Into<String>, display_name: Option<String>) -> Self {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|d| d.as_millis() as u64);
        Self {
            username: username.into(),
            display_name,
            ts,
        }
    }

    /// Name to greet the user with.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// The signed-in user, if any. A malformed value counts as signed out.
pub fn current_user<S: Storage + ?Sized>(storage: &S) -> Option<AuthUser> {
    let raw = storage.get_item(AUTH_KEY)?;
    match serde_json::from_str::<AuthUser>(&raw) {
        Ok(user) if !user.username.trim().is_empty() => Some(user),
        Ok(_) => None,
        Err(e) => {
            log::warn!("ignoring malformed {AUTH_KEY} value: {e}");
            None
        }
    }
}

pub fn sign_in<S: Storage + ?Sized>(storage: &mut S, user: &AuthUser) -> Result<()> {
    log::info!("signed in as {}", user.username);
    storage.set_item(AUTH_KEY, &serde_json::to_string(user)?)
}

pub fn sign_out<S: Storage + ?Sized>(storage: &mut S) -> Result<()> {
    log::info!("signed out");
    storage.remove_item(AUTH_KEY)
}

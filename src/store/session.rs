use std::collections::HashMap;
use std::sync::RwLock;

use super::SessionStore;
use crate::error::SessionError;
use crate::models::CurrentUser;

const USER_KEY: &str = "user";

/// 键值会话存储, "user" 条目保存当前用户的 JSON
#[derive(Debug, Default)]
pub struct LocalStorageSession {
    entries: RwLock<HashMap<String, String>>,
}

impl LocalStorageSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以 "user" 条目的原始 JSON 构建
    pub fn with_user_json(user_json: impl Into<String>) -> Self {
        let session = Self::new();
        session.set_item(USER_KEY, user_json);
        session
    }

    pub fn with_user(user: &CurrentUser) -> Result<Self, SessionError> {
        Ok(Self::with_user_json(serde_json::to_string(user)?))
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    pub fn set_item(&self, key: &str, value: impl Into<String>) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.into());
    }
}

impl SessionStore for LocalStorageSession {
    fn current_user(&self) -> Result<CurrentUser, SessionError> {
        let raw = self.get_item(USER_KEY).ok_or(SessionError::MissingUser)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

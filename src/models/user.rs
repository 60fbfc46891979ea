use serde::{Deserialize, Serialize};

/// 当前登录用户 (会话存储中 "user" 条目的内容)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    #[serde(rename = "type", default)]
    pub role: String,
    #[serde(default)]
    pub email: String,
}

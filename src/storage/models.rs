use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 用户账户（仅服务端使用，不直接序列化到响应）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// 查询历史记录
///
/// 字段名与数据库列一致（snake_case），直接作为 `/api/history` 的响应元素。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub user_id: i64,
    pub ip_address: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub isp: Option<String>,
    pub searched_at: DateTime<Utc>,
}

/// 待写入的历史记录，`id` 与 `searched_at` 由存储层分配
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryEntry {
    pub user_id: i64,
    pub ip_address: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub isp: Option<String>,
}

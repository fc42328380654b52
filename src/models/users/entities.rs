use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub mail: String,
    pub nickname: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub is_moderator: bool,
    pub count_checks: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// 是否还有剩余检查次数
    pub fn has_checks_left(&self) -> bool {
        self.count_checks > 0
    }
}

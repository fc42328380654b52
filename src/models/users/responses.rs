use serde::Serialize;
use ts_rs::TS;

// 用户个人信息（含统计）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserInfo {
    pub id: i64,
    pub mail: String,
    pub nickname: String,
    pub is_moderator: bool,
    pub count_checks: i32,
    pub count_essays: i64,
    pub count_published_essays: i64,
    pub average_result: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct NicknameResponse {
    pub nickname: String,
}

use serde::Deserialize;
use ts_rs::TS;

// 用户注册请求（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct RegisterRequest {
    pub mail: String,
    pub nickname: String,
    pub password: String,
}

// 用户创建请求（用于存储层，password 为哈希值）
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub mail: String,
    pub nickname: String,
    pub password: String,
    pub is_moderator: bool,
    pub count_checks: i32,
}

// 用户更新请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateUserRequest {
    pub mail: Option<String>,
    pub nickname: Option<String>,
}

// 昵称查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct NicknameQuery {
    pub mail: String,
}

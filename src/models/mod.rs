pub mod auth;
pub mod common;
pub mod essays;
pub mod results;
pub mod social;
pub mod system;
pub mod users;
pub mod variants;

pub use common::response::ApiResponse;

use serde::Serialize;

/// 应用启动时间
#[derive(Debug, Clone, Serialize)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，序列化为 ApiResponse.code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1006,

    // 认证与用户
    AuthFailed = 2000,
    UserNotFound = 2001,
    DuplicateEmail = 2002,
    UserValidationFailed = 2003,

    // 作文
    EssayNotFound = 3000,
    WrongOwner = 3001,
    InvalidEssayState = 3002,
    NoChecksLeft = 3003,
    GradingUnavailable = 3004,

    // 评分结果
    ResultNotFound = 4000,
    InvalidScores = 4001,

    // 点赞与评论
    AlreadyLiked = 5000,
    LikeNotFound = 5001,

    // 题目
    VariantNotFound = 6000,
}

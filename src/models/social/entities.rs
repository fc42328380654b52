use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 评论（附带作者昵称）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/social.ts")]
pub struct DetailedComment {
    pub id: i64,
    pub author_nickname: String,
    pub comment_text: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 点赞状态
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/social.ts")]
pub struct LikeState {
    pub essay_id: i64,
    pub is_liked: bool,
    pub likes: i64,
}

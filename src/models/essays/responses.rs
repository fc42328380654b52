use serde::Serialize;
use ts_rs::TS;

use super::entities::EssayStatus;
use crate::models::results::entities::GradingResult;
use crate::models::social::entities::DetailedComment;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct CreateEssayResponse {
    pub essay_id: i64,
}

// 作文列表卡片
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct EssayCard {
    pub id: i64,
    pub variant_id: i64,
    pub variant_title: String,
    pub author_nickname: String,
    pub likes: i64,
    pub score: i32,
    pub status: EssayStatus,
    pub is_published: bool,
}

// 作文详情
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct DetailedEssay {
    pub id: i64,
    pub variant_id: i64,
    pub variant_title: String,
    pub variant_text: String,
    pub essay_text: String,
    pub completed_at: chrono::DateTime<chrono::Utc>,
    pub status: EssayStatus,
    pub is_published: bool,
    pub author_id: i64,
    pub author_nickname: String,
    pub likes: i64,
    pub comments: Vec<DetailedComment>,
    pub results: Vec<GradingResult>,
}

// 申诉队列条目（版主可见）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct AppealEssay {
    pub id: i64,
    pub variant_id: i64,
    pub variant_title: String,
    pub essay_text: String,
    pub appeal_text: Option<String>,
    pub completed_at: chrono::DateTime<chrono::Utc>,
    pub status: EssayStatus,
    pub results: Vec<GradingResult>,
}

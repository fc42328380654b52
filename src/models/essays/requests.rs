use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 创建作文请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct CreateEssayRequest {
    pub essay_text: String,
    pub variant_id: i64,
}

// 更新作文正文请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct UpdateEssayRequest {
    pub essay_text: String,
}

// 申诉请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct AppealRequest {
    pub appeal_text: String,
}

/// 发往外部评分服务的请求体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GradingRequest {
    pub essay_id: i64,
    pub essay_text: String,
    pub variant_text: String,
    pub author_position: String,
}

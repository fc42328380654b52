use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/social.ts")]
pub struct CreateCommentRequest {
    pub comment_text: String,
}

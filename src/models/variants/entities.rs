use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 作文题目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/variant.ts")]
pub struct Variant {
    pub id: i64,
    pub variant_title: String,
    pub variant_text: String,
    pub author_position: String,
}

use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/variant.ts")]
pub struct CreateVariantRequest {
    pub variant_title: String,
    pub variant_text: String,
    pub author_position: String,
}

use serde::Serialize;
use ts_rs::TS;

// 站点统计
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct CountsResponse {
    pub variants_count: i64,
    pub essays_count: i64,
    pub users_count: i64,
}

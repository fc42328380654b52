//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod comments;
pub mod criteria;
pub mod essays;
pub mod likes;
pub mod result_criteria;
pub mod results;
pub mod users;
pub mod variants;

use chrono::{DateTime, Utc};

/// 数据库中的 unix 秒转为 UTC 时间
pub(crate) fn from_timestamp(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

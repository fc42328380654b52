//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod essays;
mod results;
mod social;
mod users;
mod variants;

#[cfg(test)]
mod tests;

use crate::config::AppConfig;
use crate::errors::{EssayError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config.database.pool_size, config.database.timeout)
                .await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(storage)
    }

    /// 使用已有连接创建存储并运行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| EssayError::storage_failure(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// 内存 SQLite，仅单连接以保证所有查询看到同一个库
    pub async fn in_memory() -> Result<Self> {
        let db = Self::connect_sqlite("sqlite::memory:", 1, 5).await?;
        Self::from_connection(db).await
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| EssayError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
        }

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout));

        // 内存库随连接关闭而消失
        pool_options = if in_memory {
            pool_options.idle_timeout(None).max_lifetime(None)
        } else {
            pool_options.idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options
            .connect_with(opt)
            .await
            .map_err(|e| EssayError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| EssayError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(EssayError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 唯一约束冲突
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// Storage trait 实现
use crate::models::{
    essays::{
        entities::Essay,
        requests::CreateEssayRequest,
        responses::{AppealEssay, DetailedEssay, EssayCard},
    },
    results::entities::{Criteria, CriterionScore, GradingResult, ResultKind},
    social::entities::DetailedComment,
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest},
        responses::UserInfo,
    },
    variants::{entities::Variant, requests::CreateVariantRequest},
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_mail(&self, mail: &str) -> Result<Option<User>> {
        self.get_user_by_mail_impl(mail).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn get_user_info(&self, id: i64) -> Result<Option<UserInfo>> {
        self.get_user_info_impl(id).await
    }

    async fn count_users(&self) -> Result<i64> {
        self.count_users_impl().await
    }

    async fn decrease_check_count(&self, user_id: i64) -> Result<()> {
        self.decrease_check_count_impl(user_id).await
    }

    async fn reset_all_checks(&self, default_checks: i32) -> Result<u64> {
        self.reset_all_checks_impl(default_checks).await
    }

    // 题目模块
    async fn create_variant(&self, variant: CreateVariantRequest) -> Result<Variant> {
        self.create_variant_impl(variant).await
    }

    async fn get_variant_by_id(&self, id: i64) -> Result<Option<Variant>> {
        self.get_variant_by_id_impl(id).await
    }

    async fn list_variants(&self) -> Result<Vec<Variant>> {
        self.list_variants_impl().await
    }

    async fn count_variants(&self) -> Result<i64> {
        self.count_variants_impl().await
    }

    // 作文模块
    async fn create_essay(&self, author_id: i64, essay: CreateEssayRequest) -> Result<Essay> {
        self.create_essay_impl(author_id, essay).await
    }

    async fn get_essay_by_id(&self, id: i64) -> Result<Option<Essay>> {
        self.get_essay_by_id_impl(id).await
    }

    async fn get_detailed_essay(&self, id: i64) -> Result<Option<DetailedEssay>> {
        self.get_detailed_essay_impl(id).await
    }

    async fn list_published_essays(&self) -> Result<Vec<EssayCard>> {
        self.list_published_essays_impl().await
    }

    async fn list_user_essays(&self, user_id: i64) -> Result<Vec<EssayCard>> {
        self.list_user_essays_impl(user_id).await
    }

    async fn list_appeal_essays(&self) -> Result<Vec<AppealEssay>> {
        self.list_appeal_essays_impl().await
    }

    async fn count_essays(&self) -> Result<i64> {
        self.count_essays_impl().await
    }

    async fn update_essay_text(&self, essay_id: i64, user_id: i64, text: String) -> Result<Essay> {
        self.update_essay_text_impl(essay_id, user_id, text).await
    }

    async fn save_essay(&self, essay_id: i64, user_id: i64) -> Result<Essay> {
        self.save_essay_impl(essay_id, user_id).await
    }

    async fn appeal_essay(
        &self,
        essay_id: i64,
        user_id: i64,
        appeal_text: String,
    ) -> Result<Essay> {
        self.appeal_essay_impl(essay_id, user_id, appeal_text).await
    }

    async fn set_essay_published(
        &self,
        essay_id: i64,
        user_id: i64,
        publish: bool,
    ) -> Result<Essay> {
        self.set_essay_published_impl(essay_id, user_id, publish)
            .await
    }

    // 评分模块
    async fn list_criteria(&self) -> Result<Vec<Criteria>> {
        self.list_criteria_impl().await
    }

    async fn record_result(
        &self,
        essay_id: i64,
        scores: Vec<CriterionScore>,
        kind: ResultKind,
    ) -> Result<GradingResult> {
        self.record_result_impl(essay_id, scores, kind).await
    }

    async fn get_latest_result(&self, essay_id: i64) -> Result<Option<GradingResult>> {
        self.get_latest_result_impl(essay_id).await
    }

    async fn list_results(&self, essay_id: i64) -> Result<Vec<GradingResult>> {
        self.list_results_impl(essay_id).await
    }

    // 点赞与评论模块
    async fn add_like(&self, user_id: i64, essay_id: i64) -> Result<()> {
        self.add_like_impl(user_id, essay_id).await
    }

    async fn remove_like(&self, user_id: i64, essay_id: i64) -> Result<()> {
        self.remove_like_impl(user_id, essay_id).await
    }

    async fn is_liked(&self, user_id: i64, essay_id: i64) -> Result<bool> {
        self.is_liked_impl(user_id, essay_id).await
    }

    async fn count_likes(&self, essay_id: i64) -> Result<i64> {
        self.count_likes_impl(essay_id).await
    }

    async fn add_comment(
        &self,
        user_id: i64,
        essay_id: i64,
        text: String,
    ) -> Result<DetailedComment> {
        self.add_comment_impl(user_id, essay_id, text).await
    }

    async fn list_comments(&self, essay_id: i64) -> Result<Vec<DetailedComment>> {
        self.list_comments_impl(essay_id).await
    }
}

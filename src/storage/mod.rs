use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户，邮箱重复返回 DuplicateEmail
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_mail(&self, mail: &str) -> Result<Option<User>>;
    // 更新邮箱/昵称
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 用户信息及统计
    async fn get_user_info(&self, id: i64) -> Result<Option<UserInfo>>;
    // 用户总数
    async fn count_users(&self) -> Result<i64>;

    /// 检查次数配额
    // 原子扣减一次，次数为 0 时返回 NoChecksLeft
    async fn decrease_check_count(&self, user_id: i64) -> Result<()>;
    // 将所有用户的次数重置为 default_checks，返回受影响行数
    async fn reset_all_checks(&self, default_checks: i32) -> Result<u64>;

    /// 题目管理方法
    async fn create_variant(&self, variant: CreateVariantRequest) -> Result<Variant>;
    async fn get_variant_by_id(&self, id: i64) -> Result<Option<Variant>>;
    async fn list_variants(&self) -> Result<Vec<Variant>>;
    async fn count_variants(&self) -> Result<i64>;

    /// 作文管理方法
    // 以草稿状态创建作文
    async fn create_essay(&self, author_id: i64, essay: CreateEssayRequest) -> Result<Essay>;
    async fn get_essay_by_id(&self, id: i64) -> Result<Option<Essay>>;
    // 作文详情（题目、作者、点赞、评论、评分）
    async fn get_detailed_essay(&self, id: i64) -> Result<Option<DetailedEssay>>;
    // 公开作文列表
    async fn list_published_essays(&self) -> Result<Vec<EssayCard>>;
    // 用户自己的作文列表
    async fn list_user_essays(&self, user_id: i64) -> Result<Vec<EssayCard>>;
    // 申诉队列
    async fn list_appeal_essays(&self) -> Result<Vec<AppealEssay>>;
    async fn count_essays(&self) -> Result<i64>;
    // 修改草稿正文
    async fn update_essay_text(&self, essay_id: i64, user_id: i64, text: String) -> Result<Essay>;
    // 提交评分：扣减次数并 draft → saved，同一事务
    async fn save_essay(&self, essay_id: i64, user_id: i64) -> Result<Essay>;
    // 申诉：取消发布、记录申诉内容并 checked → appeal
    async fn appeal_essay(&self, essay_id: i64, user_id: i64, appeal_text: String)
    -> Result<Essay>;
    // 发布/取消发布，已处于目标状态时不做修改
    async fn set_essay_published(&self, essay_id: i64, user_id: i64, publish: bool)
    -> Result<Essay>;

    /// 评分结果方法
    async fn list_criteria(&self) -> Result<Vec<Criteria>>;
    // 写入结果与分项评分并推进作文状态，同一事务
    async fn record_result(
        &self,
        essay_id: i64,
        scores: Vec<CriterionScore>,
        kind: ResultKind,
    ) -> Result<GradingResult>;
    async fn get_latest_result(&self, essay_id: i64) -> Result<Option<GradingResult>>;
    // 按时间顺序返回全部结果
    async fn list_results(&self, essay_id: i64) -> Result<Vec<GradingResult>>;

    /// 点赞与评论
    // 重复点赞返回 AlreadyLiked
    async fn add_like(&self, user_id: i64, essay_id: i64) -> Result<()>;
    // 未点赞返回 NotFound
    async fn remove_like(&self, user_id: i64, essay_id: i64) -> Result<()>;
    async fn is_liked(&self, user_id: i64, essay_id: i64) -> Result<bool>;
    async fn count_likes(&self, essay_id: i64) -> Result<i64>;
    async fn add_comment(&self, user_id: i64, essay_id: i64, text: String)
    -> Result<DetailedComment>;
    async fn list_comments(&self, essay_id: i64) -> Result<Vec<DetailedComment>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}

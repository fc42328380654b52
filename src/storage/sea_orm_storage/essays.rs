use std::collections::HashMap;

use super::SeaOrmStorage;
use super::users::decrease_check_count_on;
use crate::entity::essays::{ActiveModel, Column, Entity as Essays, Model as EssayModel};
use crate::entity::likes::{Column as LikeColumn, Entity as Likes};
use crate::entity::results::{Column as ResultColumn, Entity as Results};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::entity::variants::{Column as VariantColumn, Entity as Variants};
use crate::entity::from_timestamp;
use crate::errors::{EssayError, Result};
use crate::models::essays::{
    entities::{Essay, EssayAction, EssayStatus},
    requests::CreateEssayRequest,
    responses::{AppealEssay, DetailedEssay, EssayCard},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, UpdateMany,
};

impl SeaOrmStorage {
    /// 以草稿状态创建作文
    pub async fn create_essay_impl(&self, author_id: i64, req: CreateEssayRequest) -> Result<Essay> {
        if self.get_variant_by_id_impl(req.variant_id).await?.is_none() {
            return Err(EssayError::not_found(format!(
                "Variant {} not found",
                req.variant_id
            )));
        }

        let model = ActiveModel {
            essay_text: Set(req.essay_text),
            status: Set(EssayStatus::Draft.to_string()),
            is_published: Set(false),
            appeal_text: Set(None),
            user_id: Set(author_id),
            variant_id: Set(req.variant_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("创建作文失败: {e}")))?;

        Ok(result.into_essay())
    }

    pub async fn get_essay_by_id_impl(&self, id: i64) -> Result<Option<Essay>> {
        let result = Essays::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("查询作文失败: {e}")))?;

        Ok(result.map(|m| m.into_essay()))
    }

    /// 作文详情
    pub async fn get_detailed_essay_impl(&self, id: i64) -> Result<Option<DetailedEssay>> {
        let Some(essay) = self.get_essay_by_id_impl(id).await? else {
            return Ok(None);
        };

        let variant = self
            .get_variant_by_id_impl(essay.variant_id)
            .await?
            .ok_or_else(|| {
                EssayError::storage_failure(format!("作文 {id} 关联的题目不存在"))
            })?;
        let author = self
            .get_user_by_id_impl(essay.author_id)
            .await?
            .ok_or_else(|| {
                EssayError::storage_failure(format!("作文 {id} 关联的作者不存在"))
            })?;

        let likes = self.count_likes_impl(id).await?;
        let comments = self.list_comments_impl(id).await?;
        let results = self.list_results_impl(id).await?;

        Ok(Some(DetailedEssay {
            id: essay.id,
            variant_id: variant.id,
            variant_title: variant.variant_title,
            variant_text: variant.variant_text,
            essay_text: essay.essay_text,
            completed_at: essay.updated_at,
            status: essay.status,
            is_published: essay.is_published,
            author_id: author.id,
            author_nickname: author.nickname,
            likes,
            comments,
            results,
        }))
    }

    /// 公开作文列表，最近更新的在前
    pub async fn list_published_essays_impl(&self) -> Result<Vec<EssayCard>> {
        let essays = Essays::find()
            .filter(Column::IsPublished.eq(true))
            .order_by_desc(Column::UpdatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("查询公开作文失败: {e}")))?;

        self.build_cards(essays).await
    }

    pub async fn list_user_essays_impl(&self, user_id: i64) -> Result<Vec<EssayCard>> {
        let essays = Essays::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::UpdatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("查询用户作文失败: {e}")))?;

        self.build_cards(essays).await
    }

    /// 申诉队列，先提交的在前
    pub async fn list_appeal_essays_impl(&self) -> Result<Vec<AppealEssay>> {
        let essays = Essays::find()
            .filter(Column::Status.eq(EssayStatus::APPEAL))
            .order_by_asc(Column::UpdatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("查询申诉作文失败: {e}")))?;

        let titles = self
            .variant_titles(essays.iter().map(|e| e.variant_id).collect())
            .await?;

        let mut items = Vec::with_capacity(essays.len());
        for model in essays {
            let results = self.list_results_impl(model.id).await?;
            let essay = model.into_essay();
            items.push(AppealEssay {
                id: essay.id,
                variant_id: essay.variant_id,
                variant_title: titles.get(&essay.variant_id).cloned().unwrap_or_default(),
                essay_text: essay.essay_text,
                appeal_text: essay.appeal_text,
                completed_at: essay.updated_at,
                status: essay.status,
                results,
            });
        }

        Ok(items)
    }

    pub async fn count_essays_impl(&self) -> Result<i64> {
        let count = Essays::find()
            .count(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("统计作文数量失败: {e}")))?;

        Ok(count as i64)
    }

    /// 修改草稿正文
    pub async fn update_essay_text_impl(
        &self,
        essay_id: i64,
        user_id: i64,
        text: String,
    ) -> Result<Essay> {
        let mut essay = find_essay_on(&self.db, essay_id).await?.into_essay();
        essay.ensure_author(user_id)?;
        essay.ensure_editable()?;

        let now = chrono::Utc::now().timestamp();
        let result = Essays::update_many()
            .col_expr(Column::EssayText, Expr::value(text.clone()))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(essay_id))
            .filter(Column::Status.eq(EssayStatus::DRAFT))
            .exec(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("更新作文失败: {e}")))?;
        ensure_transitioned(result.rows_affected, essay_id, EssayStatus::Draft)?;

        essay.essay_text = text;
        essay.updated_at = from_timestamp(now);
        Ok(essay)
    }

    /// 提交评分：扣减次数与状态推进在同一事务内完成
    pub async fn save_essay_impl(&self, essay_id: i64, user_id: i64) -> Result<Essay> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EssayError::storage_failure(format!("开启事务失败: {e}")))?;

        // 首条语句即为写操作，SQLite 下先拿到写锁再读
        let action = EssayAction::Save;
        let now = chrono::Utc::now().timestamp();
        let result = transition(essay_id, action.source(), action.target(), now)
            .filter(Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| EssayError::storage_failure(format!("更新作文状态失败: {e}")))?;
        if result.rows_affected == 0 {
            return Err(rejected_transition(&txn, essay_id, Some(user_id), action).await);
        }

        // 次数不足时事务随 txn 丢弃而回滚
        decrease_check_count_on(&txn, user_id).await?;

        let essay = find_essay_on(&txn, essay_id).await?.into_essay();

        txn.commit()
            .await
            .map_err(|e| EssayError::storage_failure(format!("提交事务失败: {e}")))?;

        Ok(essay)
    }

    /// 申诉：取消发布并记录申诉内容
    pub async fn appeal_essay_impl(
        &self,
        essay_id: i64,
        user_id: i64,
        appeal_text: String,
    ) -> Result<Essay> {
        let mut essay = find_essay_on(&self.db, essay_id).await?.into_essay();
        essay.ensure_author(user_id)?;
        let next = essay.status.apply(EssayAction::Appeal)?;

        let now = chrono::Utc::now().timestamp();
        let result = transition(essay_id, essay.status, next, now)
            .col_expr(Column::IsPublished, Expr::value(false))
            .col_expr(Column::AppealText, Expr::value(appeal_text.clone()))
            .exec(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("提交申诉失败: {e}")))?;
        ensure_transitioned(result.rows_affected, essay_id, essay.status)?;

        essay.status = next;
        essay.is_published = false;
        essay.appeal_text = Some(appeal_text);
        essay.updated_at = from_timestamp(now);
        Ok(essay)
    }

    /// 发布/取消发布
    pub async fn set_essay_published_impl(
        &self,
        essay_id: i64,
        user_id: i64,
        publish: bool,
    ) -> Result<Essay> {
        let mut essay = find_essay_on(&self.db, essay_id).await?.into_essay();
        essay.ensure_author(user_id)?;

        let Some(is_published) = essay.publication_change(publish)? else {
            return Ok(essay);
        };

        let mut update = Essays::update_many()
            .col_expr(Column::IsPublished, Expr::value(is_published))
            .filter(Column::Id.eq(essay_id));
        if is_published {
            update = update.filter(Column::Status.ne(EssayStatus::DRAFT));
        }

        let result = update
            .exec(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("更新发布状态失败: {e}")))?;
        if result.rows_affected == 0 {
            return Err(EssayError::invalid_state(format!(
                "Essay {essay_id} changed concurrently"
            )));
        }

        essay.is_published = is_published;
        Ok(essay)
    }

    /// 批量组装作文卡片
    async fn build_cards(&self, essays: Vec<EssayModel>) -> Result<Vec<EssayCard>> {
        if essays.is_empty() {
            return Ok(Vec::new());
        }

        let essay_ids: Vec<i64> = essays.iter().map(|e| e.id).collect();
        let titles = self
            .variant_titles(essays.iter().map(|e| e.variant_id).collect())
            .await?;

        let authors: HashMap<i64, String> = Users::find()
            .filter(UserColumn::Id.is_in(essays.iter().map(|e| e.user_id).collect::<Vec<_>>()))
            .all(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("查询作者失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u.nickname))
            .collect();

        let likes: HashMap<i64, i64> = Likes::find()
            .select_only()
            .column(LikeColumn::EssayId)
            .column_as(LikeColumn::UserId.count(), "likes")
            .filter(LikeColumn::EssayId.is_in(essay_ids.clone()))
            .group_by(LikeColumn::EssayId)
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("统计点赞失败: {e}")))?
            .into_iter()
            .collect();

        // 最新一次评分
        let mut scores: HashMap<i64, i32> = HashMap::new();
        for result in Results::find()
            .filter(ResultColumn::EssayId.is_in(essay_ids))
            .order_by_desc(ResultColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("查询评分结果失败: {e}")))?
        {
            scores.entry(result.essay_id).or_insert(result.sum_score);
        }

        Ok(essays
            .into_iter()
            .map(|model| {
                let essay = model.into_essay();
                EssayCard {
                    id: essay.id,
                    variant_id: essay.variant_id,
                    variant_title: titles.get(&essay.variant_id).cloned().unwrap_or_default(),
                    author_nickname: authors.get(&essay.author_id).cloned().unwrap_or_default(),
                    likes: likes.get(&essay.id).copied().unwrap_or(0),
                    score: scores.get(&essay.id).copied().unwrap_or(0),
                    status: essay.status,
                    is_published: essay.is_published,
                }
            })
            .collect())
    }

    async fn variant_titles(&self, ids: Vec<i64>) -> Result<HashMap<i64, String>> {
        let variants = Variants::find()
            .filter(VariantColumn::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("查询题目失败: {e}")))?;

        Ok(variants
            .into_iter()
            .map(|v| (v.id, v.variant_title))
            .collect())
    }
}

pub(crate) async fn find_essay_on<C: ConnectionTrait>(conn: &C, essay_id: i64) -> Result<EssayModel> {
    Essays::find_by_id(essay_id)
        .one(conn)
        .await
        .map_err(|e| EssayError::storage_failure(format!("查询作文失败: {e}")))?
        .ok_or_else(|| EssayError::not_found(format!("Essay {essay_id} not found")))
}

/// 仅当作文仍处于 from 状态时才更新
pub(crate) fn transition(
    essay_id: i64,
    from: EssayStatus,
    to: EssayStatus,
    now: i64,
) -> UpdateMany<Essays> {
    Essays::update_many()
        .col_expr(Column::Status, Expr::value(to.as_str()))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Id.eq(essay_id))
        .filter(Column::Status.eq(from.as_str()))
}

/// 状态更新未命中时，重新读取作文给出具体原因
pub(crate) async fn rejected_transition<C: ConnectionTrait>(
    conn: &C,
    essay_id: i64,
    author_id: Option<i64>,
    action: EssayAction,
) -> EssayError {
    let essay = match find_essay_on(conn, essay_id).await {
        Ok(model) => model.into_essay(),
        Err(e) => return e,
    };
    if let Some(user_id) = author_id
        && let Err(e) = essay.ensure_author(user_id)
    {
        return e;
    }
    match essay.status.apply(action) {
        Err(e) => e,
        Ok(_) => EssayError::invalid_state(format!("Essay {essay_id} changed concurrently")),
    }
}

pub(crate) fn ensure_transitioned(rows_affected: u64, essay_id: i64, from: EssayStatus) -> Result<()> {
    if rows_affected == 0 {
        return Err(EssayError::invalid_state(format!(
            "Essay {essay_id} is no longer '{from}'"
        )));
    }
    Ok(())
}

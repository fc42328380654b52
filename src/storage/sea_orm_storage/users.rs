use std::collections::HashMap;

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::essays::{Column as EssayColumn, Entity as Essays};
use crate::entity::results::{Column as ResultColumn, Entity as Results};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{EssayError, Result};
use crate::models::users::{
    entities::User,
    requests::{CreateUserRequest, UpdateUserRequest},
    responses::UserInfo,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();
        let mail = req.mail.clone();

        let model = ActiveModel {
            mail: Set(req.mail),
            nickname: Set(req.nickname),
            password_hash: Set(req.password),
            is_moderator: Set(req.is_moderator),
            count_checks: Set(req.count_checks),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                EssayError::duplicate_email(format!("邮箱已被注册: {mail}"))
            } else {
                EssayError::storage_failure(format!("创建用户失败: {e}"))
            }
        })?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_mail_impl(&self, mail: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Mail.eq(mail))
            .one(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        // 先检查用户是否存在
        let existing = self.get_user_by_id_impl(id).await?;
        if existing.is_none() || (update.mail.is_none() && update.nickname.is_none()) {
            return Ok(existing);
        }

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };

        if let Some(mail) = update.mail.clone() {
            model.mail = Set(mail);
        }

        if let Some(nickname) = update.nickname {
            model.nickname = Set(nickname);
        }

        let result = model.update(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                EssayError::duplicate_email(format!(
                    "邮箱已被注册: {}",
                    update.mail.unwrap_or_default()
                ))
            } else {
                EssayError::storage_failure(format!("更新用户失败: {e}"))
            }
        })?;

        Ok(Some(result.into_user()))
    }

    /// 用户信息及作文统计
    pub async fn get_user_info_impl(&self, id: i64) -> Result<Option<UserInfo>> {
        let Some(user) = self.get_user_by_id_impl(id).await? else {
            return Ok(None);
        };

        let essays = Essays::find()
            .filter(EssayColumn::UserId.eq(id))
            .all(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("查询用户作文失败: {e}")))?;

        let count_essays = essays.len() as i64;
        let count_published_essays = essays.iter().filter(|e| e.is_published).count() as i64;

        // 每篇作文取最新一次评分
        let essay_ids: Vec<i64> = essays.iter().map(|e| e.id).collect();
        let results = Results::find()
            .filter(ResultColumn::EssayId.is_in(essay_ids))
            .order_by_desc(ResultColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("查询评分结果失败: {e}")))?;

        let mut latest: HashMap<i64, i32> = HashMap::new();
        for result in results {
            latest.entry(result.essay_id).or_insert(result.sum_score);
        }

        let average_result = if latest.is_empty() {
            0.0
        } else {
            latest.values().map(|s| *s as f64).sum::<f64>() / latest.len() as f64
        };

        Ok(Some(UserInfo {
            id: user.id,
            mail: user.mail,
            nickname: user.nickname,
            is_moderator: user.is_moderator,
            count_checks: user.count_checks,
            count_essays,
            count_published_essays,
            average_result,
        }))
    }

    /// 用户总数
    pub async fn count_users_impl(&self) -> Result<i64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("统计用户数量失败: {e}")))?;

        Ok(count as i64)
    }

    /// 扣减一次检查次数
    pub async fn decrease_check_count_impl(&self, user_id: i64) -> Result<()> {
        decrease_check_count_on(&self.db, user_id).await
    }

    /// 将所有用户的检查次数重置为默认值
    pub async fn reset_all_checks_impl(&self, default_checks: i32) -> Result<u64> {
        let result = Users::update_many()
            .col_expr(Column::CountChecks, Expr::value(default_checks))
            .exec(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("重置检查次数失败: {e}")))?;

        Ok(result.rows_affected)
    }
}

/// 条件更新扣减次数，可在事务内调用
pub(crate) async fn decrease_check_count_on<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
) -> Result<()> {
    let decremented = {
        use sea_orm::sea_query::ExprTrait;
        Expr::col(Column::CountChecks).sub(1)
    };

    let result = Users::update_many()
        .col_expr(Column::CountChecks, decremented)
        .filter(Column::Id.eq(user_id))
        .filter(Column::CountChecks.gt(0))
        .exec(conn)
        .await
        .map_err(|e| EssayError::storage_failure(format!("扣减检查次数失败: {e}")))?;

    if result.rows_affected > 0 {
        return Ok(());
    }

    let exists = Users::find_by_id(user_id)
        .one(conn)
        .await
        .map_err(|e| EssayError::storage_failure(format!("查询用户失败: {e}")))?
        .is_some();

    if exists {
        Err(EssayError::no_checks_left(format!(
            "User {user_id} has no checks left"
        )))
    } else {
        Err(EssayError::not_found(format!("User {user_id} not found")))
    }
}

use std::collections::HashMap;

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::comments::{
    ActiveModel as CommentActiveModel, Column as CommentColumn, Entity as Comments,
};
use crate::entity::likes::{ActiveModel as LikeActiveModel, Column as LikeColumn, Entity as Likes};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{EssayError, Result};
use crate::models::social::entities::DetailedComment;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 点赞，(user_id, essay_id) 主键保证唯一
    pub async fn add_like_impl(&self, user_id: i64, essay_id: i64) -> Result<()> {
        LikeActiveModel {
            user_id: Set(user_id),
            essay_id: Set(essay_id),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                EssayError::already_liked(format!(
                    "User {user_id} already liked essay {essay_id}"
                ))
            } else {
                EssayError::storage_failure(format!("点赞失败: {e}"))
            }
        })?;

        Ok(())
    }

    /// 取消点赞
    pub async fn remove_like_impl(&self, user_id: i64, essay_id: i64) -> Result<()> {
        let result = Likes::delete_many()
            .filter(LikeColumn::UserId.eq(user_id))
            .filter(LikeColumn::EssayId.eq(essay_id))
            .exec(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("取消点赞失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(EssayError::not_found(format!(
                "User {user_id} has not liked essay {essay_id}"
            )));
        }

        Ok(())
    }

    pub async fn is_liked_impl(&self, user_id: i64, essay_id: i64) -> Result<bool> {
        let result = Likes::find_by_id((user_id, essay_id))
            .one(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("查询点赞失败: {e}")))?;

        Ok(result.is_some())
    }

    pub async fn count_likes_impl(&self, essay_id: i64) -> Result<i64> {
        let count = Likes::find()
            .filter(LikeColumn::EssayId.eq(essay_id))
            .count(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("统计点赞数量失败: {e}")))?;

        Ok(count as i64)
    }

    /// 发表评论
    pub async fn add_comment_impl(
        &self,
        user_id: i64,
        essay_id: i64,
        text: String,
    ) -> Result<DetailedComment> {
        let author = self
            .get_user_by_id_impl(user_id)
            .await?
            .ok_or_else(|| EssayError::not_found(format!("User {user_id} not found")))?;

        let model = CommentActiveModel {
            user_id: Set(user_id),
            essay_id: Set(essay_id),
            comment_text: Set(text),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| EssayError::storage_failure(format!("发表评论失败: {e}")))?;

        Ok(model.into_detailed(author.nickname))
    }

    /// 评论列表，按发表顺序
    pub async fn list_comments_impl(&self, essay_id: i64) -> Result<Vec<DetailedComment>> {
        let comments = Comments::find()
            .filter(CommentColumn::EssayId.eq(essay_id))
            .order_by_asc(CommentColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("查询评论失败: {e}")))?;

        if comments.is_empty() {
            return Ok(Vec::new());
        }

        let author_ids: Vec<i64> = comments.iter().map(|c| c.user_id).collect();
        let nicknames: HashMap<i64, String> = Users::find()
            .filter(UserColumn::Id.is_in(author_ids))
            .all(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("查询评论作者失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u.nickname))
            .collect();

        Ok(comments
            .into_iter()
            .map(|c| {
                let nickname = nicknames.get(&c.user_id).cloned().unwrap_or_default();
                c.into_detailed(nickname)
            })
            .collect())
    }
}

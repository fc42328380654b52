use super::SeaOrmStorage;
use crate::entity::variants::{ActiveModel, Column, Entity as Variants};
use crate::errors::{EssayError, Result};
use crate::models::variants::{entities::Variant, requests::CreateVariantRequest};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建题目
    pub async fn create_variant_impl(&self, req: CreateVariantRequest) -> Result<Variant> {
        let model = ActiveModel {
            variant_title: Set(req.variant_title),
            variant_text: Set(req.variant_text),
            author_position: Set(req.author_position),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("创建题目失败: {e}")))?;

        Ok(result.into_variant())
    }

    pub async fn get_variant_by_id_impl(&self, id: i64) -> Result<Option<Variant>> {
        let result = Variants::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("查询题目失败: {e}")))?;

        Ok(result.map(|m| m.into_variant()))
    }

    pub async fn list_variants_impl(&self) -> Result<Vec<Variant>> {
        let result = Variants::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("查询题目列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_variant()).collect())
    }

    pub async fn count_variants_impl(&self) -> Result<i64> {
        let count = Variants::find()
            .count(&self.db)
            .await
            .map_err(|e| EssayError::storage_failure(format!("统计题目数量失败: {e}")))?;

        Ok(count as i64)
    }
}

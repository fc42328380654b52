//! 评分标准实体（迁移时写入，只读）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "criteria")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub title: String,
    pub max_score: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::result_criteria::Entity")]
    ResultCriteria,
}

impl Related<super::result_criteria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ResultCriteria.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_criteria(self) -> crate::models::results::entities::Criteria {
        crate::models::results::entities::Criteria {
            id: self.id,
            title: self.title,
            max_score: self.max_score,
        }
    }
}

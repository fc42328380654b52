//! 评分结果实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub essay_id: i64,
    pub sum_score: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub appeal_text: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::essays::Entity",
        from = "Column::EssayId",
        to = "super::essays::Column::Id"
    )]
    Essay,
    #[sea_orm(has_many = "super::result_criteria::Entity")]
    ResultCriteria,
}

impl Related<super::essays::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Essay.def()
    }
}

impl Related<super::result_criteria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ResultCriteria.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_result(
        self,
        criteria: Vec<super::result_criteria::Model>,
    ) -> crate::models::results::entities::GradingResult {
        let mut criteria: Vec<_> = criteria.into_iter().map(|c| c.into_score()).collect();
        criteria.sort_by_key(|c| c.criteria_id);

        crate::models::results::entities::GradingResult {
            id: self.id,
            essay_id: self.essay_id,
            sum_score: self.sum_score,
            appeal_text: self.appeal_text,
            created_at: super::from_timestamp(self.created_at),
            criteria,
        }
    }
}

//! 分项评分实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "result_criteria")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub result_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub criteria_id: i64,
    pub score: i32,
    #[sea_orm(column_type = "Text")]
    pub explanation: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::results::Entity",
        from = "Column::ResultId",
        to = "super::results::Column::Id"
    )]
    GradingResult,
    #[sea_orm(
        belongs_to = "super::criteria::Entity",
        from = "Column::CriteriaId",
        to = "super::criteria::Column::Id"
    )]
    Criteria,
}

impl Related<super::results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GradingResult.def()
    }
}

impl Related<super::criteria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Criteria.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_score(self) -> crate::models::results::entities::CriterionScore {
        crate::models::results::entities::CriterionScore {
            criteria_id: self.criteria_id,
            score: self.score,
            explanation: self.explanation,
        }
    }
}

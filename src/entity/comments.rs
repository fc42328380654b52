//! 评论实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub essay_id: i64,
    #[sea_orm(column_type = "Text")]
    pub comment_text: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::essays::Entity",
        from = "Column::EssayId",
        to = "super::essays::Column::Id"
    )]
    Essay,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::essays::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Essay.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_detailed(
        self,
        author_nickname: String,
    ) -> crate::models::social::entities::DetailedComment {
        crate::models::social::entities::DetailedComment {
            id: self.id,
            author_nickname,
            comment_text: self.comment_text,
            created_at: super::from_timestamp(self.created_at),
        }
    }
}

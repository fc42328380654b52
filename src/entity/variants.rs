//! 作文题目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "variants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub variant_title: String,
    #[sea_orm(column_type = "Text")]
    pub variant_text: String,
    #[sea_orm(column_type = "Text")]
    pub author_position: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::essays::Entity")]
    Essays,
}

impl Related<super::essays::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Essays.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_variant(self) -> crate::models::variants::entities::Variant {
        crate::models::variants::entities::Variant {
            id: self.id,
            variant_title: self.variant_title,
            variant_text: self.variant_text,
            author_position: self.author_position,
        }
    }
}

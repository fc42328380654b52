use sea_orm_migration::prelude::*;

use crate::m20250123_000001_create_tables::Criteria;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 十项评分标准 (id, 标题, 满分)
const DEFAULT_CRITERIA: [(i64, &str, i32); 10] = [
    (1, "Формулировка проблемы исходного текста", 2),
    (2, "Комментарий к сформулированной проблеме", 5),
    (3, "Отражение позиции автора исходного текста", 2),
    (4, "Отношение к позиции автора по проблеме", 2),
    (5, "Смысловая цельность и последовательность изложения", 3),
    (6, "Точность и выразительность речи", 2),
    (7, "Соблюдение орфографических норм", 3),
    (8, "Соблюдение пунктуационных норм", 3),
    (9, "Соблюдение языковых норм", 3),
    (10, "Соблюдение речевых норм", 3),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (id, title, max_score) in DEFAULT_CRITERIA {
            let insert = Query::insert()
                .into_table(Criteria::Table)
                .columns([Criteria::Id, Criteria::Title, Criteria::MaxScore])
                .values_panic([id.into(), title.into(), max_score.into()])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Criteria::Table)
            .and_where(Expr::col(Criteria::Id).between(1, 10))
            .to_owned();

        manager.exec_stmt(delete).await?;
        Ok(())
    }
}

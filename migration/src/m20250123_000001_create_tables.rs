use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Mail).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Nickname).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsModerator)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::CountChecks)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建题目表
        manager
            .create_table(
                Table::create()
                    .table(Variants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Variants::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Variants::VariantTitle).string().not_null())
                    .col(ColumnDef::new(Variants::VariantText).text().not_null())
                    .col(ColumnDef::new(Variants::AuthorPosition).text().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建作文表
        manager
            .create_table(
                Table::create()
                    .table(Essays::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Essays::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Essays::EssayText).text().not_null())
                    .col(ColumnDef::new(Essays::Status).string().not_null())
                    .col(
                        ColumnDef::new(Essays::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Essays::AppealText).text().null())
                    .col(ColumnDef::new(Essays::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Essays::VariantId).big_integer().not_null())
                    .col(ColumnDef::new(Essays::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Essays::Table, Essays::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Essays::Table, Essays::VariantId)
                            .to(Variants::Table, Variants::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建评分标准表
        manager
            .create_table(
                Table::create()
                    .table(Criteria::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Criteria::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Criteria::Title).string().not_null())
                    .col(ColumnDef::new(Criteria::MaxScore).integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建评分结果表
        manager
            .create_table(
                Table::create()
                    .table(Results::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Results::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Results::EssayId).big_integer().not_null())
                    .col(ColumnDef::new(Results::SumScore).integer().not_null())
                    .col(ColumnDef::new(Results::AppealText).text().null())
                    .col(ColumnDef::new(Results::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Results::Table, Results::EssayId)
                            .to(Essays::Table, Essays::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建分项评分表
        manager
            .create_table(
                Table::create()
                    .table(ResultCriteria::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ResultCriteria::ResultId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResultCriteria::CriteriaId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ResultCriteria::Score).integer().not_null())
                    .col(ColumnDef::new(ResultCriteria::Explanation).text().not_null())
                    .primary_key(
                        Index::create()
                            .col(ResultCriteria::ResultId)
                            .col(ResultCriteria::CriteriaId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ResultCriteria::Table, ResultCriteria::ResultId)
                            .to(Results::Table, Results::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ResultCriteria::Table, ResultCriteria::CriteriaId)
                            .to(Criteria::Table, Criteria::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建点赞表，(user_id, essay_id) 复合主键保证唯一
        manager
            .create_table(
                Table::create()
                    .table(Likes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Likes::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Likes::EssayId).big_integer().not_null())
                    .primary_key(Index::create().col(Likes::UserId).col(Likes::EssayId))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Likes::Table, Likes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Likes::Table, Likes::EssayId)
                            .to(Essays::Table, Essays::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建评论表
        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Comments::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Comments::EssayId).big_integer().not_null())
                    .col(ColumnDef::new(Comments::CommentText).text().not_null())
                    .col(ColumnDef::new(Comments::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Comments::Table, Comments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Comments::Table, Comments::EssayId)
                            .to(Essays::Table, Essays::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_essays_user_id")
                    .table(Essays::Table)
                    .col(Essays::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_essays_status")
                    .table(Essays::Table)
                    .col(Essays::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_results_essay_id")
                    .table(Results::Table)
                    .col(Results::EssayId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_likes_essay_id")
                    .table(Likes::Table)
                    .col(Likes::EssayId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_comments_essay_id")
                    .table(Comments::Table)
                    .col(Comments::EssayId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Likes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ResultCriteria::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Results::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Criteria::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Essays::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Variants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Mail,
    Nickname,
    PasswordHash,
    IsModerator,
    CountChecks,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Variants {
    #[sea_orm(iden = "variants")]
    Table,
    Id,
    VariantTitle,
    VariantText,
    AuthorPosition,
}

#[derive(DeriveIden)]
enum Essays {
    #[sea_orm(iden = "essays")]
    Table,
    Id,
    EssayText,
    Status,
    IsPublished,
    AppealText,
    UserId,
    VariantId,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Criteria {
    #[sea_orm(iden = "criteria")]
    Table,
    Id,
    Title,
    MaxScore,
}

#[derive(DeriveIden)]
enum Results {
    #[sea_orm(iden = "results")]
    Table,
    Id,
    EssayId,
    SumScore,
    AppealText,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ResultCriteria {
    #[sea_orm(iden = "result_criteria")]
    Table,
    ResultId,
    CriteriaId,
    Score,
    Explanation,
}

#[derive(DeriveIden)]
enum Likes {
    #[sea_orm(iden = "likes")]
    Table,
    UserId,
    EssayId,
}

#[derive(DeriveIden)]
enum Comments {
    #[sea_orm(iden = "comments")]
    Table,
    Id,
    UserId,
    EssayId,
    CommentText,
    CreatedAt,
}

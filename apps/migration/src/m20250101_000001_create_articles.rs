use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Articles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Articles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Articles::Title).string().not_null())
                    .col(ColumnDef::new(Articles::Content).text().not_null())
                    .col(ColumnDef::new(Articles::Excerpt).text().not_null())
                    .col(
                        ColumnDef::new(Articles::Tags)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(Articles::CoverImage).string().null())
                    .col(ColumnDef::new(Articles::AuthorId).uuid().not_null())
                    .col(ColumnDef::new(Articles::AuthorName).string().not_null())
                    .col(
                        ColumnDef::new(Articles::Status)
                            .string_len(16)
                            .not_null()
                            .default("draft")
                            .check(Expr::col(Articles::Status).is_in([
                                "draft",
                                "pending",
                                "published",
                                "rejected",
                            ])),
                    )
                    .col(
                        ColumnDef::new(Articles::ViewCount)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Articles::ViewCount).gte(0)),
                    )
                    .col(ColumnDef::new(Articles::RejectionReason).text().null())
                    .col(
                        ColumnDef::new(Articles::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Articles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Articles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing scans: public feed by status, "my articles" by author
        manager
            .create_index(
                Index::create()
                    .name("idx_articles_status_created_at")
                    .table(Articles::Table)
                    .col(Articles::Status)
                    .col(Articles::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_articles_author_id_created_at")
                    .table(Articles::Table)
                    .col(Articles::AuthorId)
                    .col(Articles::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Articles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Articles {
    Table,
    Id,
    Title,
    Content,
    Excerpt,
    Tags,
    CoverImage,
    AuthorId,
    AuthorName,
    Status,
    ViewCount,
    RejectionReason,
    PublishedAt,
    CreatedAt,
    UpdatedAt,
}

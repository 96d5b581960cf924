use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PrizeRedemptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PrizeRedemptions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PrizeRedemptions::PrizeAwardId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PrizeRedemptions::RedemptionCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PrizeRedemptions::RedeemedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PrizeRedemptions::Channel).string().not_null())
                    .col(ColumnDef::new(PrizeRedemptions::FromIp).string())
                    .col(ColumnDef::new(PrizeRedemptions::Status).string().not_null())
                    .col(ColumnDef::new(PrizeRedemptions::Notes).text())
                    .foreign_key(
                        ForeignKey::create()
                            .from(PrizeRedemptions::Table, PrizeRedemptions::PrizeAwardId)
                            .to(PrizeAwards::Table, PrizeAwards::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PrizeRedemptions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PrizeRedemptions {
    Table,
    Id,
    PrizeAwardId,
    RedemptionCode,
    RedeemedAt,
    Channel,
    FromIp,
    Status,
    Notes,
}

#[derive(Iden)]
enum PrizeAwards {
    Table,
    Id,
}

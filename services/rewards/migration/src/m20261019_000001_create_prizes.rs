use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Prizes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Prizes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Prizes::PoolId).uuid().not_null())
                    .col(ColumnDef::new(Prizes::TypeId).uuid())
                    .col(ColumnDef::new(Prizes::Name).string().not_null())
                    .col(ColumnDef::new(Prizes::MonetaryValueCents).big_integer())
                    .col(
                        ColumnDef::new(Prizes::TotalQuantity)
                            .integer()
                            .not_null()
                            .check(Expr::col(Prizes::TotalQuantity).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Prizes::RemainingQuantity)
                            .integer()
                            .not_null()
                            .check(Expr::col(Prizes::RemainingQuantity).gte(0)),
                    )
                    .col(ColumnDef::new(Prizes::ExpiryDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Prizes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Prizes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Allocation scans a pool for the lowest-id prize with stock.
        manager
            .create_index(
                Index::create()
                    .table(Prizes::Table)
                    .col(Prizes::PoolId)
                    .col(Prizes::Id)
                    .name("idx_prizes_pool_id_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Prizes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Prizes {
    Table,
    Id,
    PoolId,
    TypeId,
    Name,
    MonetaryValueCents,
    TotalQuantity,
    RemainingQuantity,
    ExpiryDate,
    IsActive,
    CreatedAt,
}

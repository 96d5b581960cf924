use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PrizeAwards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PrizeAwards::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PrizeAwards::PrizeId).uuid().not_null())
                    .col(ColumnDef::new(PrizeAwards::ExternalUserId).uuid())
                    .col(ColumnDef::new(PrizeAwards::Phone).string().not_null())
                    .col(ColumnDef::new(PrizeAwards::CompetitionId).uuid())
                    .col(
                        ColumnDef::new(PrizeAwards::AwardedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PrizeAwards::AwardedBy).uuid())
                    .col(ColumnDef::new(PrizeAwards::Method).string().not_null())
                    .col(ColumnDef::new(PrizeAwards::NotificationChannel).string())
                    .col(
                        ColumnDef::new(PrizeAwards::NotificationStatus)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PrizeAwards::Status).string().not_null())
                    .col(ColumnDef::new(PrizeAwards::ExpiryDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(PrizeAwards::ExternalReference).string())
                    .col(ColumnDef::new(PrizeAwards::CancelledAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(PrizeAwards::CancelledBy).uuid())
                    .col(ColumnDef::new(PrizeAwards::CancellationReason).string())
                    .foreign_key(
                        ForeignKey::create()
                            .from(PrizeAwards::Table, PrizeAwards::PrizeId)
                            .to(Prizes::Table, Prizes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Redemption looks up the redeemable awards of a phone.
        manager
            .create_index(
                Index::create()
                    .table(PrizeAwards::Table)
                    .col(PrizeAwards::Phone)
                    .col(PrizeAwards::Status)
                    .name("idx_prize_awards_phone_status")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(PrizeAwards::Table)
                    .col(PrizeAwards::PrizeId)
                    .name("idx_prize_awards_prize_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PrizeAwards::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PrizeAwards {
    Table,
    Id,
    PrizeId,
    ExternalUserId,
    Phone,
    CompetitionId,
    AwardedAt,
    AwardedBy,
    Method,
    NotificationChannel,
    NotificationStatus,
    Status,
    ExpiryDate,
    ExternalReference,
    CancelledAt,
    CancelledBy,
    CancellationReason,
}

#[derive(Iden)]
enum Prizes {
    Table,
    Id,
}

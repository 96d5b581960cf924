use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SmsMessages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SmsMessages::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SmsMessages::Phone).string().not_null())
                    .col(ColumnDef::new(SmsMessages::Body).text().not_null())
                    .col(ColumnDef::new(SmsMessages::Kind).string().not_null())
                    .col(ColumnDef::new(SmsMessages::RelatedEntityType).string())
                    .col(ColumnDef::new(SmsMessages::RelatedEntityId).uuid())
                    .col(ColumnDef::new(SmsMessages::Status).string().not_null())
                    .col(
                        ColumnDef::new(SmsMessages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SmsMessages::SentAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(SmsMessages::ProviderReference).string())
                    .col(ColumnDef::new(SmsMessages::FailureReason).text())
                    .col(
                        ColumnDef::new(SmsMessages::RetryCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(SmsMessages::Table)
                    .col(SmsMessages::Phone)
                    .name("idx_sms_messages_phone")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SmsMessages::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SmsMessages {
    Table,
    Id,
    Phone,
    Body,
    Kind,
    RelatedEntityType,
    RelatedEntityId,
    Status,
    CreatedAt,
    SentAt,
    ProviderReference,
    FailureReason,
    RetryCount,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OneTimePasswords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OneTimePasswords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OneTimePasswords::Phone).string().not_null())
                    .col(ColumnDef::new(OneTimePasswords::Code).string().not_null())
                    .col(ColumnDef::new(OneTimePasswords::Purpose).string().not_null())
                    .col(ColumnDef::new(OneTimePasswords::RelatedEntityId).uuid())
                    .col(
                        ColumnDef::new(OneTimePasswords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OneTimePasswords::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OneTimePasswords::UsedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(OneTimePasswords::AttemptCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(OneTimePasswords::MaxAttempts)
                            .integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Send invalidates and verify loads by (phone, purpose), newest first.
        manager
            .create_index(
                Index::create()
                    .table(OneTimePasswords::Table)
                    .col(OneTimePasswords::Phone)
                    .col(OneTimePasswords::Purpose)
                    .col(OneTimePasswords::CreatedAt)
                    .name("idx_one_time_passwords_phone_purpose_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OneTimePasswords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum OneTimePasswords {
    Table,
    Id,
    Phone,
    Code,
    Purpose,
    RelatedEntityId,
    CreatedAt,
    ExpiresAt,
    UsedAt,
    AttemptCount,
    MaxAttempts,
}

//! Create `certificate` table.
//!
//! `owner_id` has no foreign key: admins may record certificates for
//! owners without an account here.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Certificate::Table)
                    .if_not_exists()
                    .col(pk_auto(Certificate::Id))
                    .col(string_len(Certificate::Name, 255).not_null())
                    .col(string_len(Certificate::Type, 32).not_null())
                    .col(string_len(Certificate::Status, 16).not_null())
                    .col(string_len(Certificate::Owner, 128).not_null())
                    .col(uuid(Certificate::OwnerId).not_null())
                    .col(text(Certificate::Content).not_null())
                    .col(timestamp_with_time_zone(Certificate::IssuedDate).not_null())
                    .col(timestamp_with_time_zone(Certificate::ExpirationDate).not_null())
                    .col(timestamp_with_time_zone(Certificate::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Certificate::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Certificate::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Certificate {
    Table,
    Id,
    Name,
    Type,
    Status,
    Owner,
    OwnerId,
    Content,
    IssuedDate,
    ExpirationDate,
    CreatedAt,
    UpdatedAt,
}

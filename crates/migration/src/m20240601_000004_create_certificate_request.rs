//! Create `certificate_request` table.
//! Approval and rejection columns stay NULL until the request is resolved.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CertificateRequest::Table)
                    .if_not_exists()
                    .col(pk_auto(CertificateRequest::Id))
                    .col(string_len(CertificateRequest::UserName, 128).not_null())
                    .col(uuid(CertificateRequest::UserId).not_null())
                    .col(string_len(CertificateRequest::Type, 32).not_null())
                    .col(string_len(CertificateRequest::Status, 16).not_null())
                    .col(text(CertificateRequest::Reason).not_null())
                    .col(ColumnDef::new(CertificateRequest::ApprovedBy).string_len(128).null())
                    .col(ColumnDef::new(CertificateRequest::ApprovedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(CertificateRequest::RejectedBy).string_len(128).null())
                    .col(ColumnDef::new(CertificateRequest::RejectedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(CertificateRequest::RejectedReason).text().null())
                    .col(timestamp_with_time_zone(CertificateRequest::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(CertificateRequest::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CertificateRequest::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CertificateRequest {
    Table,
    Id,
    UserName,
    UserId,
    Type,
    Status,
    Reason,
    ApprovedBy,
    ApprovedAt,
    RejectedBy,
    RejectedAt,
    RejectedReason,
    CreatedAt,
    UpdatedAt,
}

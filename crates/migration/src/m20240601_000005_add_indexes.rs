use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Certificate: lookups by owner
        manager
            .create_index(
                Index::create()
                    .name("idx_certificate_owner")
                    .table(Certificate::Table)
                    .col(Certificate::OwnerId)
                    .to_owned(),
            )
            .await?;

        // CertificateRequest: pending check filters on (user_id, status)
        manager
            .create_index(
                Index::create()
                    .name("idx_certificate_request_user_status")
                    .table(CertificateRequest::Table)
                    .col(CertificateRequest::UserId)
                    .col(CertificateRequest::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_certificate_owner").table(Certificate::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_certificate_request_user_status")
                    .table(CertificateRequest::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Certificate { Table, OwnerId }

#[derive(DeriveIden)]
enum CertificateRequest { Table, UserId, Status }

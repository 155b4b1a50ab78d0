//! `user_credentials`: one argon2 hash per user, removed with the user.
use sea_orm_migration::{prelude::*, schema::*};

use crate::m20240601_000001_create_user::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut owner_fk = ForeignKey::create()
            .name("fk_credentials_owner")
            .from(UserCredentials::Table, UserCredentials::UserId)
            .to(User::Table, User::Id)
            .on_delete(ForeignKeyAction::Cascade)
            .to_owned();

        let table = Table::create()
            .table(UserCredentials::Table)
            .if_not_exists()
            .col(uuid(UserCredentials::Id).primary_key())
            .col(uuid_uniq(UserCredentials::UserId))
            .col(string_len(UserCredentials::PasswordHash, 255))
            .col(string_len(UserCredentials::PasswordAlgorithm, 64))
            .col(timestamp_with_time_zone(UserCredentials::CreatedAt))
            .col(timestamp_with_time_zone(UserCredentials::UpdatedAt))
            .foreign_key(&mut owner_fk)
            .to_owned();

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserCredentials::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserCredentials {
    Table,
    Id,
    UserId,
    PasswordHash,
    PasswordAlgorithm,
    CreatedAt,
    UpdatedAt,
}

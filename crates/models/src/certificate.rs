use std::fmt;

use sea_orm::{entity::prelude::*, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Kind of credential a certificate (or a request for one) represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum CertificateType {
    #[sea_orm(string_value = "client")]
    Client,
    #[sea_orm(string_value = "server")]
    Server,
}

impl CertificateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateType::Client => "client",
            CertificateType::Server => "server",
        }
    }
}

impl fmt::Display for CertificateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Status of an issued certificate. Request states live in
/// [`crate::certificate_request::RequestStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum CertificateStatus {
    #[sea_orm(string_value = "valid")]
    Valid,
    #[sea_orm(string_value = "expiring")]
    Expiring,
    #[sea_orm(string_value = "expired")]
    Expired,
    #[sea_orm(string_value = "revoked")]
    Revoked,
}

impl CertificateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateStatus::Valid => "valid",
            CertificateStatus::Expiring => "expiring",
            CertificateStatus::Expired => "expired",
            CertificateStatus::Revoked => "revoked",
        }
    }

    /// Valid and expiring certificates block a new request by the same owner.
    pub fn is_active(&self) -> bool {
        matches!(self, CertificateStatus::Valid | CertificateStatus::Expiring)
    }
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "certificate")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub cert_type: CertificateType,
    pub status: CertificateStatus,
    pub owner: String,
    pub owner_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub issued_date: DateTimeWithTimeZone,
    pub expiration_date: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Insert payload; ids and bookkeeping timestamps are assigned on insert.
#[derive(Clone, Debug)]
pub struct NewCertificate {
    pub name: String,
    pub cert_type: CertificateType,
    pub status: CertificateStatus,
    pub owner: String,
    pub owner_id: Uuid,
    pub content: String,
    pub issued_date: DateTimeWithTimeZone,
    pub expiration_date: DateTimeWithTimeZone,
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("certificate name required".into()));
    }
    if name.len() > 255 {
        return Err(ModelError::Validation("certificate name too long (<=255)".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewCertificate) -> Result<Model, ModelError> {
    validate_name(&new.name)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        name: Set(new.name),
        cert_type: Set(new.cert_type),
        status: Set(new.status),
        owner: Set(new.owner),
        owner_id: Set(new.owner_id),
        content: Set(new.content),
        issued_date: Set(new.issued_date),
        expiration_date: Set(new.expiration_date),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// Most recently created certificate of an owner.
pub async fn find_by_owner<C: ConnectionTrait>(db: &C, owner_id: Uuid) -> Result<Option<Model>, ModelError> {
    let found = Entity::find()
        .filter(Column::OwnerId.eq(owner_id))
        .order_by_desc(Column::Id)
        .one(db)
        .await?;
    Ok(found)
}

/// Any `valid` or `expiring` certificate of an owner, regardless of age.
pub async fn find_active_by_owner<C: ConnectionTrait>(db: &C, owner_id: Uuid) -> Result<Option<Model>, ModelError> {
    let found = Entity::find()
        .filter(Column::OwnerId.eq(owner_id))
        .filter(Column::Status.is_in([CertificateStatus::Valid, CertificateStatus::Expiring]))
        .one(db)
        .await?;
    Ok(found)
}

/// One page (0-based index) ordered by id plus the total row count.
pub async fn list_page<C: ConnectionTrait>(db: &C, page_idx: u64, per_page: u64) -> Result<(Vec<Model>, u64), ModelError> {
    let paginator = Entity::find().order_by_asc(Column::Id).paginate(db, per_page);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(page_idx).await?;
    Ok((rows, total))
}

/// Overwrite name and expiration date.
pub async fn update_details<C: ConnectionTrait>(
    db: &C,
    id: i32,
    name: &str,
    expiration_date: DateTimeWithTimeZone,
) -> Result<Model, ModelError> {
    let mut am: ActiveModel = find_by_id(db, id)
        .await?
        .ok_or_else(|| ModelError::NotFound(format!("certificate {id}")))?
        .into();
    am.name = Set(name.to_string());
    am.expiration_date = Set(expiration_date);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn set_status<C: ConnectionTrait>(db: &C, id: i32, status: CertificateStatus) -> Result<Model, ModelError> {
    let mut am: ActiveModel = find_by_id(db, id)
        .await?
        .ok_or_else(|| ModelError::NotFound(format!("certificate {id}")))?
        .into();
    am.status = Set(status);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Hard delete; returns true if a row was removed.
pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_statuses() {
        assert!(CertificateStatus::Valid.is_active());
        assert!(CertificateStatus::Expiring.is_active());
        assert!(!CertificateStatus::Expired.is_active());
        assert!(!CertificateStatus::Revoked.is_active());
    }

    #[test]
    fn type_serializes_lowercase() {
        assert_eq!(serde_json::to_value(CertificateType::Client).unwrap(), "client");
        let t: CertificateType = serde_json::from_value(serde_json::json!("server")).unwrap();
        assert_eq!(t, CertificateType::Server);
        assert!(serde_json::from_value::<CertificateType>(serde_json::json!("email")).is_err());
    }

    #[test]
    fn empty_name_rejected() {
        assert!(validate_name("  ").is_err());
        assert!(validate_name("alice-client-cert").is_ok());
    }
}

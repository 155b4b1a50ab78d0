use std::fmt;

use sea_orm::{
    entity::prelude::*, sea_query::Expr, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::certificate::CertificateType;
use crate::errors::ModelError;

/// Request lifecycle: `pending` until resolved exactly once.
/// Approved requests keep the historical storage value `valid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum RequestStatus {
    #[sea_orm(string_value = "pending")]
    #[serde(rename = "pending")]
    Pending,
    #[sea_orm(string_value = "valid")]
    #[serde(rename = "valid")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    #[serde(rename = "rejected")]
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "valid",
            RequestStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "certificate_request")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_name: String,
    pub user_id: Uuid,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub cert_type: CertificateType,
    pub status: RequestStatus,
    #[sea_orm(column_type = "Text")]
    pub reason: String,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub rejected_by: Option<String>,
    pub rejected_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rejected_reason: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn is_pending(&self) -> bool { self.status == RequestStatus::Pending }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug)]
pub struct NewCertificateRequest {
    pub user_name: String,
    pub user_id: Uuid,
    pub cert_type: CertificateType,
    pub reason: String,
}

pub fn validate_new(new: &NewCertificateRequest) -> Result<(), ModelError> {
    if new.user_name.trim().is_empty() {
        return Err(ModelError::Validation("user_name required".into()));
    }
    if new.reason.trim().is_empty() {
        return Err(ModelError::Validation("reason required".into()));
    }
    Ok(())
}

/// Insert a request in `pending` status.
pub async fn create_pending<C: ConnectionTrait>(db: &C, new: NewCertificateRequest) -> Result<Model, ModelError> {
    validate_new(&new)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        user_name: Set(new.user_name),
        user_id: Set(new.user_id),
        cert_type: Set(new.cert_type),
        status: Set(RequestStatus::Pending),
        reason: Set(new.reason),
        approved_by: Set(None),
        approved_at: Set(None),
        rejected_by: Set(None),
        rejected_at: Set(None),
        rejected_reason: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn find_pending_by_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<Option<Model>, ModelError> {
    let found = Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::Status.eq(RequestStatus::Pending))
        .one(db)
        .await?;
    Ok(found)
}

/// All requests of a user, newest first.
pub async fn list_by_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<Vec<Model>, ModelError> {
    let rows = Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_desc(Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

/// One page (0-based index), newest first, plus the total row count.
pub async fn list_page<C: ConnectionTrait>(db: &C, page_idx: u64, per_page: u64) -> Result<(Vec<Model>, u64), ModelError> {
    let paginator = Entity::find().order_by_desc(Column::Id).paginate(db, per_page);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(page_idx).await?;
    Ok((rows, total))
}

/// Transition `pending -> valid`. Returns false when the row is missing or
/// no longer pending, in which case nothing was written.
pub async fn mark_approved<C: ConnectionTrait>(
    db: &C,
    id: i32,
    approved_by: &str,
    approved_at: DateTimeWithTimeZone,
) -> Result<bool, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Status, Expr::value(RequestStatus::Approved.as_str()))
        .col_expr(Column::ApprovedBy, Expr::value(Some(approved_by.to_string())))
        .col_expr(Column::ApprovedAt, Expr::value(Some(approved_at)))
        .col_expr(Column::UpdatedAt, Expr::value(approved_at))
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(RequestStatus::Pending))
        .exec(db)
        .await?;
    Ok(res.rows_affected == 1)
}

/// Transition `pending -> rejected`; same contract as [`mark_approved`].
pub async fn mark_rejected<C: ConnectionTrait>(
    db: &C,
    id: i32,
    rejected_by: &str,
    reason: &str,
    rejected_at: DateTimeWithTimeZone,
) -> Result<bool, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Status, Expr::value(RequestStatus::Rejected.as_str()))
        .col_expr(Column::RejectedBy, Expr::value(Some(rejected_by.to_string())))
        .col_expr(Column::RejectedAt, Expr::value(Some(rejected_at)))
        .col_expr(Column::RejectedReason, Expr::value(Some(reason.to_string())))
        .col_expr(Column::UpdatedAt, Expr::value(rejected_at))
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(RequestStatus::Pending))
        .exec(db)
        .await?;
    Ok(res.rows_affected == 1)
}

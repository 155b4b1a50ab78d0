use chrono::{DateTime, Duration, FixedOffset, Utc};
use common::types::PageResp;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use models::certificate::{self, CertificateStatus, CertificateType, NewCertificate};
use models::certificate_request::{self, NewCertificateRequest};

use super::domain::{issued_certificate_name, Caller};
use crate::errors::ServiceError;
use crate::owner_locks::OwnerLocks;
use crate::pagination::Pagination;

/// Certificate and certificate-request workflows over SeaORM.
///
/// Approval and tenant request creation run inside a database transaction;
/// tenant request creation is additionally serialized per owner.
pub struct CertificateService {
    db: DatabaseConnection,
    locks: OwnerLocks,
    validity_days: i64,
}

impl CertificateService {
    pub fn new(db: DatabaseConnection, cfg: &configs::CertificateConfig) -> Self {
        Self { db, locks: OwnerLocks::new(), validity_days: cfg.validity_days }
    }

    fn expiration_from(&self, issued: DateTime<Utc>) -> Result<DateTime<Utc>, ServiceError> {
        Duration::try_days(self.validity_days)
            .and_then(|d| issued.checked_add_signed(d))
            .ok_or_else(|| ServiceError::Validation(format!("validity of {} days is out of range", self.validity_days)))
    }

    // --- certificates ---

    pub async fn list_certificates(&self, page: Pagination) -> Result<PageResp<certificate::Model>, ServiceError> {
        let (content, total) = certificate::list_page(&self.db, page.index(), page.size()).await?;
        Ok(PageResp { content, total })
    }

    pub async fn get_certificate(&self, id: i32) -> Result<certificate::Model, ServiceError> {
        certificate::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(&format!("certificate {id}")))
    }

    /// A tenant without a certificate gets `None`, not an error.
    pub async fn get_certificate_for_tenant(&self, owner_id: Uuid) -> Result<Option<certificate::Model>, ServiceError> {
        Ok(certificate::find_by_owner(&self.db, owner_id).await?)
    }

    #[instrument(skip(self, new), fields(owner_id = %new.owner_id))]
    pub async fn create_certificate(&self, new: NewCertificate) -> Result<certificate::Model, ServiceError> {
        let created = certificate::create(&self.db, new).await?;
        info!(event = "certificate_created", id = created.id, name = %created.name, "certificate created");
        Ok(created)
    }

    /// Overwrite name and expiration date as given.
    #[instrument(skip(self, name))]
    pub async fn update_certificate_details(
        &self,
        id: i32,
        name: &str,
        expiration_date: DateTime<FixedOffset>,
    ) -> Result<certificate::Model, ServiceError> {
        let updated = certificate::update_details(&self.db, id, name, expiration_date).await?;
        info!(event = "certificate_updated", id, "certificate updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn revoke_certificate(&self, id: i32) -> Result<certificate::Model, ServiceError> {
        let revoked = certificate::set_status(&self.db, id, CertificateStatus::Revoked).await?;
        info!(event = "certificate_revoked", id, owner_id = %revoked.owner_id, "certificate revoked");
        Ok(revoked)
    }

    #[instrument(skip(self))]
    pub async fn delete_certificate(&self, id: i32) -> Result<(), ServiceError> {
        if !certificate::delete(&self.db, id).await? {
            return Err(ServiceError::not_found(&format!("certificate {id}")));
        }
        info!(event = "certificate_deleted", id, "certificate deleted");
        Ok(())
    }

    // --- requests ---

    pub async fn list_requests(&self, page: Pagination) -> Result<PageResp<certificate_request::Model>, ServiceError> {
        let (content, total) = certificate_request::list_page(&self.db, page.index(), page.size()).await?;
        Ok(PageResp { content, total })
    }

    pub async fn get_request(&self, id: i32) -> Result<certificate_request::Model, ServiceError> {
        certificate_request::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(&format!("certificate request {id}")))
    }

    pub async fn list_tenant_requests(&self, user_id: Uuid) -> Result<Vec<certificate_request::Model>, ServiceError> {
        Ok(certificate_request::list_by_user(&self.db, user_id).await?)
    }

    /// Admin path: no duplicate checks.
    #[instrument(skip(self, new), fields(user_id = %new.user_id))]
    pub async fn create_request(&self, new: NewCertificateRequest) -> Result<certificate_request::Model, ServiceError> {
        let created = certificate_request::create_pending(&self.db, new).await?;
        info!(event = "request_created", id = created.id, "certificate request created by admin");
        Ok(created)
    }

    /// Tenant path: refuses when the caller already holds an active
    /// certificate or has a request in flight.
    #[instrument(skip(self, caller, reason), fields(user_id = %caller.id))]
    pub async fn create_tenant_request(
        &self,
        caller: &Caller,
        cert_type: CertificateType,
        reason: &str,
    ) -> Result<certificate_request::Model, ServiceError> {
        let _guard = self.locks.acquire(caller.id).await;
        self.create_tenant_request_locked(caller, cert_type, reason).await
    }

    async fn create_tenant_request_locked(
        &self,
        caller: &Caller,
        cert_type: CertificateType,
        reason: &str,
    ) -> Result<certificate_request::Model, ServiceError> {
        let txn = self.db.begin().await?;
        let new = NewCertificateRequest {
            user_name: caller.name.clone(),
            user_id: caller.id,
            cert_type,
            reason: reason.to_string(),
        };
        let outcome = Self::tenant_request_in_txn(&txn, new).await;
        let created = finish(txn, outcome).await?;
        info!(event = "request_created", id = created.id, cert_type = %created.cert_type, "certificate request submitted");
        Ok(created)
    }

    async fn tenant_request_in_txn(
        txn: &DatabaseTransaction,
        new: NewCertificateRequest,
    ) -> Result<certificate_request::Model, ServiceError> {
        if certificate::find_active_by_owner(txn, new.user_id).await?.is_some() {
            return Err(ServiceError::CertificateExists);
        }
        if certificate_request::find_pending_by_user(txn, new.user_id).await?.is_some() {
            return Err(ServiceError::RequestPending);
        }
        Ok(certificate_request::create_pending(txn, new).await?)
    }

    /// Resolve a pending request by issuing a certificate. The status change
    /// and the certificate insert commit together.
    #[instrument(skip(self, approver), fields(approver = %approver.name))]
    pub async fn approve_request(&self, id: i32, approver: &Caller) -> Result<certificate::Model, ServiceError> {
        let txn = self.db.begin().await?;
        let outcome = self.approve_in_txn(&txn, id, approver).await;
        let cert = finish(txn, outcome).await?;
        info!(event = "request_approved", request_id = id, certificate_id = cert.id, "certificate request approved");
        Ok(cert)
    }

    async fn approve_in_txn(
        &self,
        txn: &DatabaseTransaction,
        id: i32,
        approver: &Caller,
    ) -> Result<certificate::Model, ServiceError> {
        let req = load_pending(txn, id).await?;
        let now = Utc::now();
        let expires = self.expiration_from(now)?;
        if !certificate_request::mark_approved(txn, id, &approver.name, now.into()).await? {
            return Err(lost_race(txn, id, req.status).await?);
        }
        // Content stays empty: no key material is generated here.
        let new = NewCertificate {
            name: issued_certificate_name(&req.user_name, req.cert_type),
            cert_type: req.cert_type,
            status: CertificateStatus::Valid,
            owner: req.user_name,
            owner_id: req.user_id,
            content: String::new(),
            issued_date: now.into(),
            expiration_date: expires.into(),
        };
        Ok(certificate::create(txn, new).await?)
    }

    #[instrument(skip(self, rejecter, reason), fields(rejecter = %rejecter.name))]
    pub async fn reject_request(
        &self,
        id: i32,
        rejecter: &Caller,
        reason: &str,
    ) -> Result<certificate_request::Model, ServiceError> {
        if reason.trim().is_empty() {
            return Err(ServiceError::Validation("reason required".into()));
        }
        let txn = self.db.begin().await?;
        let outcome = Self::reject_in_txn(&txn, id, rejecter, reason).await;
        let rejected = finish(txn, outcome).await?;
        info!(event = "request_rejected", request_id = id, "certificate request rejected");
        Ok(rejected)
    }

    async fn reject_in_txn(
        txn: &DatabaseTransaction,
        id: i32,
        rejecter: &Caller,
        reason: &str,
    ) -> Result<certificate_request::Model, ServiceError> {
        let req = load_pending(txn, id).await?;
        if !certificate_request::mark_rejected(txn, id, &rejecter.name, reason, Utc::now().into()).await? {
            return Err(lost_race(txn, id, req.status).await?);
        }
        certificate_request::find_by_id(txn, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(&format!("certificate request {id}")))
    }
}

async fn load_pending(txn: &DatabaseTransaction, id: i32) -> Result<certificate_request::Model, ServiceError> {
    let req = certificate_request::find_by_id(txn, id)
        .await?
        .ok_or_else(|| ServiceError::not_found(&format!("certificate request {id}")))?;
    if !req.is_pending() {
        return Err(ServiceError::NotPending { status: req.status });
    }
    Ok(req)
}

/// The conditional update matched nothing: someone resolved the request
/// between our read and our write. Report the status they left behind.
async fn lost_race(
    txn: &DatabaseTransaction,
    id: i32,
    seen: models::certificate_request::RequestStatus,
) -> Result<ServiceError, ServiceError> {
    let status = certificate_request::find_by_id(txn, id).await?.map(|r| r.status).unwrap_or(seen);
    warn!(event = "request_transition_conflict", request_id = id, %status, "request resolved concurrently");
    Ok(ServiceError::NotPending { status })
}

/// Commit on success, roll back on failure.
async fn finish<T>(txn: DatabaseTransaction, outcome: Result<T, ServiceError>) -> Result<T, ServiceError> {
    match outcome {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rb) = txn.rollback().await {
                warn!(error = %rb, "transaction rollback failed");
            }
            Err(e)
        }
    }
}

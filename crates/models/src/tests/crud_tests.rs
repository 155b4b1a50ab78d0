use anyhow::Result;
use chrono::{Duration, Utc};
use uuid::Uuid;

use super::setup_test_db;
use crate::certificate::{self, CertificateStatus, CertificateType, NewCertificate};
use crate::certificate_request::{self, NewCertificateRequest, RequestStatus};
use crate::{errors::ModelError, user, user_credentials};

fn new_cert(owner: &str, owner_id: Uuid) -> NewCertificate {
    let now = Utc::now();
    NewCertificate {
        name: format!("{owner}-client-cert"),
        cert_type: CertificateType::Client,
        status: CertificateStatus::Valid,
        owner: owner.to_string(),
        owner_id,
        content: String::new(),
        issued_date: now.into(),
        expiration_date: (now + Duration::days(365)).into(),
    }
}

/// Test certificate CRUD operations
#[tokio::test]
async fn test_certificate_crud() -> Result<()> {
    let db = setup_test_db().await?;
    let owner_id = Uuid::new_v4();

    let created = certificate::create(&db, new_cert("alice", owner_id)).await?;
    assert!(created.id > 0);
    assert_eq!(created.status, CertificateStatus::Valid);

    let found = certificate::find_by_id(&db, created.id).await?.unwrap();
    assert_eq!(found.name, "alice-client-cert");
    assert_eq!(found.cert_type, CertificateType::Client);

    let by_owner = certificate::find_by_owner(&db, owner_id).await?.unwrap();
    assert_eq!(by_owner.id, created.id);
    assert!(certificate::find_by_owner(&db, Uuid::new_v4()).await?.is_none());

    let new_exp = Utc::now() + Duration::days(30);
    let updated = certificate::update_details(&db, created.id, "renamed", new_exp.into()).await?;
    assert_eq!(updated.name, "renamed");
    assert_eq!(updated.expiration_date.timestamp(), new_exp.timestamp());

    let revoked = certificate::set_status(&db, created.id, CertificateStatus::Revoked).await?;
    assert_eq!(revoked.status, CertificateStatus::Revoked);

    assert!(certificate::delete(&db, created.id).await?);
    assert!(!certificate::delete(&db, created.id).await?);
    assert!(certificate::find_by_id(&db, created.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_update_missing_certificate_is_not_found() -> Result<()> {
    let db = setup_test_db().await?;
    let err = certificate::update_details(&db, 4242, "x", Utc::now().into()).await.unwrap_err();
    assert!(matches!(err, ModelError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn test_find_by_owner_returns_latest() -> Result<()> {
    let db = setup_test_db().await?;
    let owner_id = Uuid::new_v4();
    let first = certificate::create(&db, new_cert("bob", owner_id)).await?;
    certificate::set_status(&db, first.id, CertificateStatus::Revoked).await?;
    let second = certificate::create(&db, new_cert("bob", owner_id)).await?;

    let latest = certificate::find_by_owner(&db, owner_id).await?.unwrap();
    assert_eq!(latest.id, second.id);
    assert_eq!(latest.status, CertificateStatus::Valid);
    Ok(())
}

#[tokio::test]
async fn test_certificate_pagination() -> Result<()> {
    let db = setup_test_db().await?;
    for i in 0..5 {
        certificate::create(&db, new_cert(&format!("user{i}"), Uuid::new_v4())).await?;
    }
    let (page0, total) = certificate::list_page(&db, 0, 2).await?;
    assert_eq!(total, 5);
    assert_eq!(page0.len(), 2);
    let (page2, _) = certificate::list_page(&db, 2, 2).await?;
    assert_eq!(page2.len(), 1);
    assert!(page0[0].id < page0[1].id);
    Ok(())
}

#[tokio::test]
async fn test_request_crud() -> Result<()> {
    let db = setup_test_db().await?;
    let user_id = Uuid::new_v4();
    let req = certificate_request::create_pending(&db, NewCertificateRequest {
        user_name: "carol".into(),
        user_id,
        cert_type: CertificateType::Server,
        reason: "new web host".into(),
    }).await?;
    assert_eq!(req.status, RequestStatus::Pending);
    assert!(req.approved_by.is_none() && req.rejected_at.is_none());

    let pending = certificate_request::find_pending_by_user(&db, user_id).await?.unwrap();
    assert_eq!(pending.id, req.id);

    let mine = certificate_request::list_by_user(&db, user_id).await?;
    assert_eq!(mine.len(), 1);
    assert!(certificate_request::list_by_user(&db, Uuid::new_v4()).await?.is_empty());

    let (all, total) = certificate_request::list_page(&db, 0, 20).await?;
    assert_eq!(total, 1);
    assert_eq!(all[0].cert_type, CertificateType::Server);
    Ok(())
}

#[tokio::test]
async fn test_user_and_credentials() -> Result<()> {
    let db = setup_test_db().await?;
    let u = user::create(&db, "Dave@Example.com", "dave", user::UserRole::User).await?;
    assert_eq!(u.email, "dave@example.com");

    let found = user::find_by_email(&db, "DAVE@example.com").await?.unwrap();
    assert_eq!(found.id, u.id);

    let c1 = user_credentials::upsert_password(&db, u.id, "hash-1".into(), "argon2").await?;
    let c2 = user_credentials::upsert_password(&db, u.id, "hash-2".into(), "argon2").await?;
    assert_eq!(c1.id, c2.id);
    assert_eq!(user_credentials::find_by_user(&db, u.id).await?.unwrap().password_hash, "hash-2");
    Ok(())
}

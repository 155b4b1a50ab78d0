//! OpenAPI document. Models live in crates without utoipa, so the schemas
//! below mirror their wire shape.

use chrono::{DateTime, Utc};
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub email: String, pub name: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
#[schema(rename_all = "lowercase")]
pub enum CertificateTypeDoc { Client, Server }

#[derive(ToSchema)]
#[schema(rename_all = "lowercase")]
pub enum CertificateStatusDoc { Valid, Expiring, Expired, Revoked }

/// Approved requests read `valid`.
#[derive(ToSchema)]
#[schema(rename_all = "lowercase")]
pub enum RequestStatusDoc { Pending, Valid, Rejected }

#[derive(ToSchema)]
pub struct CertificateDoc {
    pub id: i32,
    pub name: String,
    #[schema(rename = "type")]
    pub cert_type: CertificateTypeDoc,
    pub status: CertificateStatusDoc,
    pub owner: String,
    pub owner_id: Uuid,
    pub content: String,
    pub issued_date: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(ToSchema)]
pub struct CertificateRequestDoc {
    pub id: i32,
    pub user_name: String,
    pub user_id: Uuid,
    #[schema(rename = "type")]
    pub cert_type: CertificateTypeDoc,
    pub status: RequestStatusDoc,
    pub reason: String,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<String>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejected_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(ToSchema)]
pub struct CertificatePageDoc { pub content: Vec<CertificateDoc>, pub total: u64 }

#[derive(ToSchema)]
pub struct CertificateRequestPageDoc { pub content: Vec<CertificateRequestDoc>, pub total: u64 }

#[derive(ToSchema)]
pub struct CreateCertificateDoc {
    pub name: String,
    #[schema(rename = "type")]
    pub cert_type: CertificateTypeDoc,
    pub owner: String,
    pub owner_id: Uuid,
    pub content: String,
    pub issued_date: Option<DateTime<Utc>>,
    pub expiration_date: DateTime<Utc>,
}

#[derive(ToSchema)]
pub struct UpdateCertificateDoc { pub name: String, pub expiration_date: DateTime<Utc> }

#[derive(ToSchema)]
pub struct CreateRequestDoc {
    pub user_name: String,
    pub user_id: Uuid,
    #[schema(rename = "type")]
    pub cert_type: CertificateTypeDoc,
    pub reason: String,
}

#[derive(ToSchema)]
pub struct TenantRequestDoc {
    #[schema(rename = "type")]
    pub cert_type: CertificateTypeDoc,
    pub reason: String,
}

#[derive(ToSchema)]
pub struct RejectDoc { pub reason: String }

/// `page` is 1-based; `per_page` is clamped to 1..=100.
#[derive(IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::certificates::list,
        crate::routes::certificates::create,
        crate::routes::certificates::update,
        crate::routes::certificates::delete,
        crate::routes::certificates::revoke,
        crate::routes::certificates::download,
        crate::routes::requests::list,
        crate::routes::requests::create,
        crate::routes::requests::approve,
        crate::routes::requests::reject,
        crate::routes::tenant::create_request,
        crate::routes::tenant::my_certificate,
        crate::routes::tenant::my_requests,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            CertificateTypeDoc,
            CertificateStatusDoc,
            RequestStatusDoc,
            CertificateDoc,
            CertificateRequestDoc,
            CertificatePageDoc,
            CertificateRequestPageDoc,
            CreateCertificateDoc,
            UpdateCertificateDoc,
            CreateRequestDoc,
            TenantRequestDoc,
            RejectDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "certificates"),
        (name = "certificate-requests"),
        (name = "tenant")
    )
)]
pub struct ApiDoc;

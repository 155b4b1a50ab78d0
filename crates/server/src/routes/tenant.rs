use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use models::certificate::{self, CertificateType};
use models::certificate_request;

use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use crate::routes::auth::{CurrentUser, ServerState};

#[derive(Debug, Deserialize)]
pub struct TenantRequestInput {
    #[serde(rename = "type")]
    pub cert_type: CertificateType,
    pub reason: String,
}

#[utoipa::path(
    post, path = "/tenant/certificate-requests", tag = "tenant",
    request_body = crate::openapi::TenantRequestDoc,
    responses(
        (status = 200, description = "Submitted", body = crate::openapi::CertificateRequestDoc),
        (status = 400, description = "Certificate exists or request pending")
    )
)]
pub async fn create_request(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(input): ApiJson<TenantRequestInput>,
) -> Result<Json<certificate_request::Model>, JsonApiError> {
    let created = state.certificates.create_tenant_request(&user.caller(), input.cert_type, &input.reason).await?;
    Ok(Json(created))
}

/// `null` when the caller holds no certificate.
#[utoipa::path(
    get, path = "/tenant/certificate", tag = "tenant",
    responses((status = 200, description = "Own certificate or null", body = crate::openapi::CertificateDoc))
)]
pub async fn my_certificate(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Option<certificate::Model>>, JsonApiError> {
    Ok(Json(state.certificates.get_certificate_for_tenant(user.id).await?))
}

#[utoipa::path(
    get, path = "/tenant/certificate-requests", tag = "tenant",
    responses((status = 200, description = "Own requests, newest first", body = [crate::openapi::CertificateRequestDoc]))
)]
pub async fn my_requests(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<certificate_request::Model>>, JsonApiError> {
    Ok(Json(state.certificates.list_tenant_requests(user.id).await?))
}

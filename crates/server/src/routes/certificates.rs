use axum::{extract::State, http::{header, StatusCode}, response::IntoResponse, Json};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::types::PageResp;
use models::certificate::{self, CertificateStatus, CertificateType, NewCertificate};
use service::pagination::Pagination;

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::routes::auth::ServerState;

/// Served by the download endpoint; not tied to any stored certificate.
pub const PLACEHOLDER_PEM: &str =
    "-----BEGIN CERTIFICATE-----\nMIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEA...\n-----END CERTIFICATE-----";

#[derive(Debug, Deserialize)]
pub struct CreateCertificateInput {
    pub name: String,
    #[serde(rename = "type")]
    pub cert_type: CertificateType,
    #[serde(default)]
    pub owner: String,
    pub owner_id: Uuid,
    pub content: String,
    /// Defaults to the time of the call.
    #[serde(default)]
    pub issued_date: Option<DateTime<FixedOffset>>,
    pub expiration_date: DateTime<FixedOffset>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCertificateInput {
    pub name: String,
    pub expiration_date: DateTime<FixedOffset>,
}

#[utoipa::path(
    get, path = "/admin/certificates", tag = "certificates",
    params(crate::openapi::PageQuery),
    responses((status = 200, description = "List OK", body = crate::openapi::CertificatePageDoc), (status = 400, description = "Bad Query"))
)]
pub async fn list(State(state): State<ServerState>, ApiQuery(page): ApiQuery<Pagination>) -> Result<Json<PageResp<certificate::Model>>, JsonApiError> {
    let page = state.certificates.list_certificates(page).await?;
    info!(count = page.content.len(), total = page.total, "list certificates");
    Ok(Json(page))
}

#[utoipa::path(
    post, path = "/admin/certificates", tag = "certificates",
    request_body = crate::openapi::CreateCertificateDoc,
    responses((status = 200, description = "Created", body = crate::openapi::CertificateDoc), (status = 400, description = "Validation Error"))
)]
pub async fn create(State(state): State<ServerState>, ApiJson(input): ApiJson<CreateCertificateInput>) -> Result<Json<certificate::Model>, JsonApiError> {
    if input.content.trim().is_empty() {
        return Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some("content required".into())));
    }
    let new = NewCertificate {
        name: input.name,
        cert_type: input.cert_type,
        status: CertificateStatus::Valid,
        owner: input.owner,
        owner_id: input.owner_id,
        content: input.content,
        issued_date: input.issued_date.unwrap_or_else(|| Utc::now().into()),
        expiration_date: input.expiration_date,
    };
    let created = state.certificates.create_certificate(new).await?;
    Ok(Json(created))
}

#[utoipa::path(
    put, path = "/admin/certificates/{id}", tag = "certificates",
    params(("id" = i32, Path, description = "Certificate id")),
    request_body = crate::openapi::UpdateCertificateDoc,
    responses((status = 200, description = "Updated", body = crate::openapi::CertificateDoc), (status = 400, description = "Bad Request"), (status = 404, description = "Not Found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<UpdateCertificateInput>,
) -> Result<Json<certificate::Model>, JsonApiError> {
    let updated = state.certificates.update_certificate_details(id, &input.name, input.expiration_date).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/admin/certificates/{id}", tag = "certificates",
    params(("id" = i32, Path, description = "Certificate id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<StatusCode, JsonApiError> {
    state.certificates.delete_certificate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post, path = "/admin/certificates/{id}/revoke", tag = "certificates",
    params(("id" = i32, Path, description = "Certificate id")),
    responses((status = 204, description = "Revoked"), (status = 404, description = "Not Found"))
)]
pub async fn revoke(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<StatusCode, JsonApiError> {
    state.certificates.revoke_certificate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fixed placeholder PEM. Issued certificates carry no key material yet, so
/// there is no stored `content` to serve per certificate.
#[utoipa::path(
    get, path = "/admin/certificates/download", tag = "certificates",
    responses((status = 200, description = "PEM text", content_type = "application/x-pem-file", body = String))
)]
pub async fn download() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/x-pem-file"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"certificate.pem\""),
        ],
        PLACEHOLDER_PEM,
    )
}

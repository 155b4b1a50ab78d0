use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::types::PageResp;
use models::certificate::{self, CertificateType};
use models::certificate_request::{self, NewCertificateRequest};
use service::pagination::Pagination;

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::routes::auth::{CurrentUser, ServerState};

#[derive(Debug, Deserialize)]
pub struct CreateRequestInput {
    pub user_name: String,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub cert_type: CertificateType,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct RejectInput {
    pub reason: String,
}

#[utoipa::path(
    get, path = "/admin/certificate-requests", tag = "certificate-requests",
    params(crate::openapi::PageQuery),
    responses((status = 200, description = "List OK", body = crate::openapi::CertificateRequestPageDoc), (status = 400, description = "Bad Query"))
)]
pub async fn list(State(state): State<ServerState>, ApiQuery(page): ApiQuery<Pagination>) -> Result<Json<PageResp<certificate_request::Model>>, JsonApiError> {
    let page = state.certificates.list_requests(page).await?;
    info!(count = page.content.len(), total = page.total, "list certificate requests");
    Ok(Json(page))
}

#[utoipa::path(
    post, path = "/admin/certificate-requests", tag = "certificate-requests",
    request_body = crate::openapi::CreateRequestDoc,
    responses((status = 200, description = "Created", body = crate::openapi::CertificateRequestDoc), (status = 400, description = "Validation Error"))
)]
pub async fn create(State(state): State<ServerState>, ApiJson(input): ApiJson<CreateRequestInput>) -> Result<Json<certificate_request::Model>, JsonApiError> {
    let new = NewCertificateRequest {
        user_name: input.user_name,
        user_id: input.user_id,
        cert_type: input.cert_type,
        reason: input.reason,
    };
    let created = state.certificates.create_request(new).await?;
    Ok(Json(created))
}

#[utoipa::path(
    post, path = "/admin/certificate-requests/{id}/approve", tag = "certificate-requests",
    params(("id" = i32, Path, description = "Request id")),
    responses((status = 200, description = "Approved; issued certificate", body = crate::openapi::CertificateDoc), (status = 400, description = "Not Pending"), (status = 404, description = "Not Found"))
)]
pub async fn approve(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<certificate::Model>, JsonApiError> {
    let cert = state.certificates.approve_request(id, &user.caller()).await?;
    Ok(Json(cert))
}

#[utoipa::path(
    post, path = "/admin/certificate-requests/{id}/reject", tag = "certificate-requests",
    params(("id" = i32, Path, description = "Request id")),
    request_body = crate::openapi::RejectDoc,
    responses((status = 204, description = "Rejected"), (status = 400, description = "Not Pending"), (status = 404, description = "Not Found"))
)]
pub async fn reject(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<RejectInput>,
) -> Result<StatusCode, JsonApiError> {
    state.certificates.reject_request(id, &user.caller(), &input.reason).await?;
    Ok(StatusCode::NO_CONTENT)
}

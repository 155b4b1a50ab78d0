use std::sync::Arc;

use axum::{extract::{Request, State}, http::{header, Method, StatusCode}, middleware::Next, response::Response, Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::user::UserRole;
use service::auth::{
    domain::{Claims, LoginInput, RegisterInput},
    repo::seaorm::SeaOrmAuthRepository,
    service::AuthService,
};
use service::certificate::{Caller, CertificateService};

use crate::errors::JsonApiError;
use crate::extract::ApiJson;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
    pub certificates: Arc<CertificateService>,
}

/// Identity resolved from a verified token, available to handlers via `Extension`.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool { self.role == UserRole::Admin }

    pub fn caller(&self) -> Caller { Caller::new(self.id, self.name.clone()) }
}

impl From<Claims> for CurrentUser {
    fn from(c: Claims) -> Self {
        let role = UserRole::parse(&c.role).unwrap_or(UserRole::User);
        Self { id: c.uid, email: c.sub, name: c.name, role }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RegisterOutput { pub user_id: Uuid }

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginOutput { pub user_id: Uuid, pub email: String, pub name: String, pub role: UserRole, pub token: String }

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 200, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(State(state): State<ServerState>, ApiJson(input): ApiJson<RegisterInput>) -> Result<Json<RegisterOutput>, JsonApiError> {
    let user = state.auth.register(input).await?;
    Ok(Json(RegisterOutput { user_id: user.id }))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(State(state): State<ServerState>, jar: CookieJar, ApiJson(input): ApiJson<LoginInput>) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let session = state.auth.login(input).await?;
    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    let jar = jar.add(cookie);
    let user = session.user;
    let out = LoginOutput { user_id: user.id, email: user.email, name: user.name, role: user.role, token: session.token };
    Ok((jar, Json(out)))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 204, description = "Logged Out")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    let jar = jar.remove(cookie);
    (jar, StatusCode::NO_CONTENT)
}

fn is_public(method: &Method, path: &str) -> bool {
    path == "/health"
        || path == "/auth/login"
        || path == "/auth/register"
        || path.starts_with("/docs")
        || path.starts_with("/api-docs")
        || method == Method::OPTIONS
}

/// Bearer token from `Authorization`, falling back to the `auth_token` cookie.
/// `Err` means a malformed Authorization header, `Ok(None)` means no token at all.
fn token_from_request(req: &Request) -> Result<Option<String>, JsonApiError> {
    if let Some(h) = req.headers().get(header::AUTHORIZATION) {
        let h = h.to_str().map_err(|_| JsonApiError::unauthorized("invalid Authorization header"))?;
        return match h.strip_prefix("Bearer ") {
            Some(tok) if !tok.trim().is_empty() => Ok(Some(tok.trim().to_string())),
            _ => Err(JsonApiError::unauthorized("invalid Authorization format (expect Bearer)")),
        };
    }
    let jar = CookieJar::from_headers(req.headers());
    Ok(jar.get(AUTH_COOKIE).map(|c| c.value().to_string()).filter(|v| !v.is_empty()))
}

/// 全局中间件：除白名单外，校验 Bearer token 并注入 CurrentUser
/// 缺失 token 返回 400，非法或过期返回 401
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    if is_public(req.method(), &path) {
        return Ok(next.run(req).await);
    }

    let token = match token_from_request(&req) {
        Ok(Some(t)) => t,
        Ok(None) => {
            tracing::warn!(path = %path, "missing Authorization header and auth_token cookie");
            return Err(JsonApiError::bad_request("missing token"));
        }
        Err(e) => {
            tracing::warn!(path = %path, "malformed Authorization header");
            return Err(e);
        }
    };

    match state.auth.verify_token(&token) {
        Ok(claims) => {
            req.extensions_mut().insert(CurrentUser::from(claims));
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(path = %path, err = %e, "token validation failed");
            Err(JsonApiError::unauthorized("invalid or expired token"))
        }
    }
}

/// Route layer for `/admin/*`; runs after [`require_bearer_token_state`].
pub async fn require_admin(Extension(user): Extension<CurrentUser>, req: Request, next: Next) -> Result<Response, JsonApiError> {
    if !user.is_admin() {
        tracing::warn!(user_id = %user.id, path = %req.uri().path(), "non-admin on admin route");
        return Err(JsonApiError::forbidden("admin role required"));
    }
    Ok(next.run(req).await)
}

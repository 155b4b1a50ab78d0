#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use serde_json::{json, Value};
use tower::Service;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const PASSWORD: &str = "S3curePass!";

/// Fresh app over its own in-memory database.
pub async fn build_app() -> anyhow::Result<Router> {
    let db = models::db::connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    let mut cfg = configs::AppConfig::default();
    cfg.auth.jwt_secret = "test-secret".into();
    cfg.auth.admin_emails = vec![ADMIN_EMAIL.into()];
    let state = server::build_state(db, &cfg);
    Ok(server::build_app(state))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
    pub text: String,
}

pub async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<TestResponse> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => builder.header("content-type", "application/json").body(Body::from(serde_json::to_vec(&b)?))?,
        None => builder.body(Body::empty())?,
    };
    send_request(app, req).await
}

pub async fn send_request(app: &Router, req: Request<Body>) -> anyhow::Result<TestResponse> {
    let resp = app.clone().call(req).await?;
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let text = String::from_utf8_lossy(&bytes).to_string();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Ok(TestResponse { status, headers, body, text })
}

/// Register then log in; returns the bearer token.
pub async fn register_and_login(app: &Router, email: &str, name: &str) -> anyhow::Result<String> {
    let resp = send(app, "POST", "/auth/register", None, Some(json!({"email": email, "name": name, "password": PASSWORD}))).await?;
    assert_eq!(resp.status, StatusCode::OK, "register {email}: {}", resp.text);
    let resp = send(app, "POST", "/auth/login", None, Some(json!({"email": email, "password": PASSWORD}))).await?;
    assert_eq!(resp.status, StatusCode::OK, "login {email}: {}", resp.text);
    let token = resp.body["token"].as_str().unwrap_or_default().to_string();
    assert!(!token.is_empty());
    Ok(token)
}

pub async fn admin_token(app: &Router) -> anyhow::Result<String> {
    register_and_login(app, ADMIN_EMAIL, "admin").await
}

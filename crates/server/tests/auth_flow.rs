mod support;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use support::{build_app, register_and_login, send, send_request, PASSWORD};

#[tokio::test]
async fn test_register_and_login_flow() -> anyhow::Result<()> {
    let app = build_app().await?;

    let resp = send(&app, "POST", "/auth/register", None, Some(json!({"email": "user@example.com", "name": "Tester", "password": PASSWORD}))).await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body["user_id"].is_string());

    let resp = send(&app, "POST", "/auth/login", None, Some(json!({"email": "user@example.com", "password": PASSWORD}))).await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["role"], "user");
    // Must set cookie
    let cookie = resp.headers.get("set-cookie").and_then(|v| v.to_str().ok()).unwrap_or_default();
    assert!(cookie.starts_with("auth_token="));
    Ok(())
}

#[tokio::test]
async fn test_admin_email_gets_admin_role() -> anyhow::Result<()> {
    let app = build_app().await?;
    send(&app, "POST", "/auth/register", None, Some(json!({"email": "Admin@Example.com", "name": "admin", "password": PASSWORD}))).await?;
    let resp = send(&app, "POST", "/auth/login", None, Some(json!({"email": "admin@example.com", "password": PASSWORD}))).await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["role"], "admin");
    Ok(())
}

#[tokio::test]
async fn test_login_wrong_password() -> anyhow::Result<()> {
    let app = build_app().await?;
    register_and_login(&app, "wrong@example.com", "Tester").await?;

    let resp = send(&app, "POST", "/auth/login", None, Some(json!({"email": "wrong@example.com", "password": "wrong-pass"}))).await?;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["error"], "Unauthorized");
    Ok(())
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() -> anyhow::Result<()> {
    let app = build_app().await?;
    let body = json!({"email": "dup@example.com", "name": "Dup", "password": PASSWORD});
    assert_eq!(send(&app, "POST", "/auth/register", None, Some(body.clone())).await?.status, StatusCode::OK);
    assert_eq!(send(&app, "POST", "/auth/register", None, Some(body)).await?.status, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn test_register_short_password_rejected() -> anyhow::Result<()> {
    let app = build_app().await?;
    let resp = send(&app, "POST", "/auth/register", None, Some(json!({"email": "a@b.com", "name": "A", "password": "short"}))).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() -> anyhow::Result<()> {
    let app = build_app().await?;
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))?;
    let resp = send_request(&app, req).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "Bad Request");

    // Missing field
    let resp = send(&app, "POST", "/auth/login", None, Some(json!({"email": "x@y.com"}))).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_token_required() -> anyhow::Result<()> {
    let app = build_app().await?;

    let resp = send(&app, "GET", "/tenant/certificate", None, None).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = send(&app, "GET", "/tenant/certificate", Some("garbage"), None).await?;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    let req = Request::builder().uri("/tenant/certificate").header("authorization", "Basic abc").body(Body::empty())?;
    assert_eq!(send_request(&app, req).await?.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_cookie_token_accepted() -> anyhow::Result<()> {
    let app = build_app().await?;
    let token = register_and_login(&app, "cookie@example.com", "cookie").await?;
    let req = Request::builder()
        .uri("/tenant/certificate")
        .header("cookie", format!("auth_token={token}"))
        .body(Body::empty())?;
    let resp = send_request(&app, req).await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.is_null());
    Ok(())
}

#[tokio::test]
async fn test_non_admin_forbidden_on_admin_routes() -> anyhow::Result<()> {
    let app = build_app().await?;
    let token = register_and_login(&app, "tenant@example.com", "tenant").await?;
    for (method, uri) in [
        ("GET", "/admin/certificates"),
        ("GET", "/admin/certificate-requests"),
        ("POST", "/admin/certificate-requests/1/approve"),
        ("GET", "/admin/certificates/download"),
    ] {
        let resp = send(&app, method, uri, Some(&token), None).await?;
        assert_eq!(resp.status, StatusCode::FORBIDDEN, "{method} {uri}");
    }
    Ok(())
}

#[tokio::test]
async fn test_logout_clears_cookie() -> anyhow::Result<()> {
    let app = build_app().await?;
    let token = register_and_login(&app, "bye@example.com", "bye").await?;
    let resp = send(&app, "POST", "/auth/logout", Some(&token), None).await?;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    let cookie = resp.headers.get("set-cookie").and_then(|v| v.to_str().ok()).unwrap_or_default();
    assert!(cookie.starts_with("auth_token="));
    Ok(())
}

#[tokio::test]
async fn test_public_routes() -> anyhow::Result<()> {
    let app = build_app().await?;
    let resp = send(&app, "GET", "/health", None, None).await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["status"], "ok");

    let resp = send(&app, "GET", "/api-docs/openapi.json", None, None).await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body["paths"]["/tenant/certificate-requests"].is_object());
    Ok(())
}

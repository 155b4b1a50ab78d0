use models::user::UserRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `POST /auth/register` body.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    /// Display name; becomes the owner name on issued certificates.
    pub name: String,
    pub password: String,
}

/// `POST /auth/login` body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// An account as seen by the auth workflows. Each account is its own tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool { self.role == UserRole::Admin }
}

/// Stored password hash; never leaves the service layer.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: Uuid,
    pub password_hash: String,
    pub password_algorithm: String,
}

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}

/// JWT payload. `sub` carries the email, `uid` the user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: Uuid,
    pub name: String,
    pub role: String,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    pub fn is_admin(&self) -> bool { self.role == UserRole::Admin.as_str() }
}

use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use models::user::{self, UserRole};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument, warn};

use super::domain::{AuthSession, AuthUser, Claims, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub password_algorithm: String,
    pub token_ttl_hours: i64,
    /// Emails registered with the `admin` role; stored lowercased.
    pub admin_emails: Vec<String>,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self { jwt_secret: jwt_secret.into(), password_algorithm: "argon2".into(), token_ttl_hours: 12, admin_emails: Vec::new() }
    }

    pub fn with_admins<I, S>(mut self, emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.admin_emails = emails.into_iter().map(|e| e.as_ref().trim().to_ascii_lowercase()).collect();
        self
    }

    fn role_for(&self, email: &str) -> UserRole {
        let email = email.trim().to_ascii_lowercase();
        if self.admin_emails.iter().any(|e| *e == email) { UserRole::Admin } else { UserRole::User }
    }
}

impl From<&configs::AuthConfig> for AuthConfig {
    fn from(cfg: &configs::AuthConfig) -> Self {
        let mut out = Self::new(cfg.jwt_secret.clone()).with_admins(&cfg.admin_emails);
        out.token_ttl_hours = cfg.token_ttl_hours;
        out
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::new("secret"));
    /// let input = RegisterInput { email: "user@example.com".into(), name: "Test".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// assert!(!user.is_admin());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        user::validate_email(&input.email)?;
        user::validate_name(&input.name)?;
        if input.password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::EmailTaken);
        }

        let role = self.cfg.role_for(&input.email);
        let user = self.repo.create_user(&input.email, &input.name, role).await?;
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .to_string();

        let _cred = self.repo.upsert_password(user.id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(user_id = %user.id, email = %user.email, role = user.role.as_str(), "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig::new("secret"));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), name: "N".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(svc.verify_token(&session.token).is_ok());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::Hash(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            warn!(user_id = %user.id, "login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    /// HS256 token valid for `token_ttl_hours`.
    pub fn issue_token(&self, user: &AuthUser) -> Result<String, AuthError> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(self.cfg.token_ttl_hours);
        let claims = Claims {
            sub: user.email.clone(),
            uid: user.id,
            name: user.name.clone(),
            role: user.role.as_str().to_string(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    /// Decode and validate signature and expiry.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        verify_token(&self.cfg.jwt_secret, token)
    }
}

/// Stateless verification usable without a repository.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AuthError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::domain::LoginInput;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc() -> AuthService<MockAuthRepository> {
        let cfg = AuthConfig::new("test-secret").with_admins([" Root@Example.com "]);
        AuthService::new(Arc::new(MockAuthRepository::default()), cfg)
    }

    fn register_input(email: &str) -> RegisterInput {
        RegisterInput { email: email.into(), name: "Tester".into(), password: "S3curePass!".into() }
    }

    #[tokio::test]
    async fn admin_email_gets_admin_role() {
        let svc = svc();
        let admin = svc.register(register_input("root@example.com")).await.unwrap();
        assert_eq!(admin.role, UserRole::Admin);
        let user = svc.register(register_input("alice@example.com")).await.unwrap();
        assert_eq!(user.role, UserRole::User);
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let svc = svc();
        svc.register(register_input("bob@example.com")).await.unwrap();
        let err = svc.register(register_input("BOB@example.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn short_password_and_bad_email_rejected() {
        let svc = svc();
        let mut input = register_input("carol@example.com");
        input.password = "short".into();
        assert!(matches!(svc.register(input).await.unwrap_err(), AuthError::Validation(_)));
        assert!(matches!(svc.register(register_input("nope")).await.unwrap_err(), AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn login_issues_verifiable_token() {
        let svc = svc();
        let user = svc.register(register_input("dave@example.com")).await.unwrap();
        let session = svc
            .login(LoginInput { email: "dave@example.com".into(), password: "S3curePass!".into() })
            .await
            .unwrap();
        let claims = svc.verify_token(&session.token).unwrap();
        assert_eq!(claims.uid, user.id);
        assert_eq!(claims.sub, "dave@example.com");
        assert_eq!(claims.name, "Tester");
        assert!(!claims.is_admin());
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn wrong_password_unauthorized() {
        let svc = svc();
        svc.register(register_input("erin@example.com")).await.unwrap();
        let err = svc
            .login(LoginInput { email: "erin@example.com".into(), password: "wrong-password".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        let err = svc
            .login(LoginInput { email: "ghost@example.com".into(), password: "whatever1".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn token_signed_with_other_secret_rejected() {
        let user = AuthUser { id: uuid::Uuid::new_v4(), email: "f@e.com".into(), name: "F".into(), role: UserRole::User };
        let token = svc().issue_token(&user).unwrap();
        assert!(verify_token("other-secret", &token).is_err());
        assert!(verify_token("test-secret", "not-a-token").is_err());
    }
}

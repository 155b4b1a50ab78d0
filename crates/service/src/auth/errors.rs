use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("email already registered")]
    EmailTaken,
    /// Wrong password and unknown email look the same to callers.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("user store error: {0}")]
    Storage(String),
}

impl AuthError {
    /// Short label for the `kind` field of failure logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "validation",
            AuthError::EmailTaken => "email_taken",
            AuthError::InvalidCredentials => "credentials",
            AuthError::InvalidToken(_) => "token",
            AuthError::Hash(_) => "hash",
            AuthError::Storage(_) => "storage",
        }
    }
}

impl From<ModelError> for AuthError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => AuthError::Validation(msg),
            ModelError::NotFound(_) => AuthError::InvalidCredentials,
            ModelError::Db(msg) => AuthError::Storage(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_rows_surface_as_bad_credentials() {
        let e: AuthError = ModelError::NotFound("user".into()).into();
        assert!(matches!(e, AuthError::InvalidCredentials));
        assert_eq!(e.kind(), "credentials");
    }

    #[test]
    fn storage_failures_keep_message() {
        let e: AuthError = ModelError::Db("connection reset".into()).into();
        assert_eq!(e.kind(), "storage");
        assert_eq!(e.to_string(), "user store error: connection reset");
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated identity on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub id: Uuid,
    pub name: String,
}

impl Caller {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self { Self { id, name: name.into() } }
}

/// Name given to certificates issued through request approval.
pub fn issued_certificate_name(user_name: &str, cert_type: models::certificate::CertificateType) -> String {
    format!("{}-{}-cert", user_name, cert_type)
}

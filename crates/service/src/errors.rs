use models::certificate_request::RequestStatus;
use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("certificate already exists for user")]
    CertificateExists,
    #[error("certificate request is pending for user")]
    RequestPending,
    #[error("request is not pending, current status: {status}")]
    NotPending { status: RequestStatus },
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => Self::Validation(msg),
            ModelError::NotFound(what) => Self::NotFound(format!("{} not found", what)),
            ModelError::Db(msg) => Self::Db(msg),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { Self::Db(e.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_messages_are_stable() {
        assert_eq!(ServiceError::CertificateExists.to_string(), "certificate already exists for user");
        assert_eq!(ServiceError::RequestPending.to_string(), "certificate request is pending for user");
        assert_eq!(
            ServiceError::NotPending { status: RequestStatus::Rejected }.to_string(),
            "request is not pending, current status: rejected"
        );
    }

    #[test]
    fn model_not_found_maps_to_not_found() {
        let e: ServiceError = ModelError::NotFound("certificate 3".into()).into();
        assert!(matches!(e, ServiceError::NotFound(ref m) if m == "certificate 3 not found"));
    }
}

//! Certificate lifecycle: admin CRUD, tenant requests, approval and rejection.

pub mod domain;
pub mod service;

pub use domain::Caller;
pub use service::CertificateService;

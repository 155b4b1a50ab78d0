//! Service layer providing business-oriented operations on top of models.
//! - Separates business rules (duplicate checks, request resolution) from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides typed error variants that the HTTP layer maps to status codes.

pub mod errors;
pub mod auth;
pub mod pagination;
pub mod owner_locks;
pub mod certificate;
#[cfg(test)]
pub mod test_support;

use thiserror::Error;

use crate::repository::errors::RepositoryError;

pub mod api;
pub mod catalogs;
pub mod insights;
pub mod main;
pub mod products;
pub mod reports;
pub mod storefront;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the service layer and mapped to responses in routes.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The caller is not allowed to perform the operation.
    #[error("unauthorized")]
    Unauthorized,
    /// The referenced record does not exist for this owner.
    #[error("not found")]
    NotFound,
    /// The operation would violate an invariant or matched ambiguously.
    #[error("conflict: {0}")]
    Conflict(String),
    /// A submitted form or body failed validation.
    #[error("invalid input: {0}")]
    Form(String),
    /// The external generation service failed.
    #[error("upstream error: {0}")]
    Upstream(String),
    /// Any other persistence failure.
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Conflict(reason) => Self::Conflict(reason),
            other => Self::Repository(other),
        }
    }
}

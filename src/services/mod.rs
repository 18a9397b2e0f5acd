use pushkind_common::repository::errors::RepositoryError;
use thiserror::Error;

use crate::forms::Violation;

pub mod media_objects;
pub mod products;
pub mod taxonomies;

/// Result type returned by the service layer.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by services to the HTTP layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The payload failed validation; one entry per failed rule.
    #[error("validation failed")]
    Validation(Vec<Violation>),
    /// The request could not be interpreted.
    #[error("{0}")]
    BadRequest(String),
    /// The addressed resource does not exist.
    #[error("not found")]
    NotFound,
    /// The request conflicts with the stored data.
    #[error("{0}")]
    Conflict(String),
    /// Persistence failed.
    #[error("repository error: {0}")]
    Repository(RepositoryError),
    /// Uploaded files could not be stored.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

/// Page number requested by the client; missing, malformed or values below 1 read as 1.
pub(crate) fn requested_page(page: Option<&str>) -> usize {
    match page.map(str::trim) {
        None | Some("") => 1,
        Some(raw) => match raw.parse::<usize>() {
            Ok(page) => page.max(1),
            Err(_) => {
                log::warn!("Ignoring malformed page parameter `{raw}`");
                1
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_not_found_maps_to_not_found() {
        let err = ServiceError::from(RepositoryError::NotFound);

        assert!(matches!(err, ServiceError::NotFound));
    }

    #[test]
    fn requested_page_is_lenient() {
        assert_eq!(requested_page(None), 1);
        assert_eq!(requested_page(Some("")), 1);
        assert_eq!(requested_page(Some("0")), 1);
        assert_eq!(requested_page(Some("-2")), 1);
        assert_eq!(requested_page(Some("abc")), 1);
        assert_eq!(requested_page(Some("3")), 3);
    }
}

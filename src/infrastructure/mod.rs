pub mod account_repo;
pub mod cart_repo;
pub mod catalog_repo;
pub mod models;
pub mod order_repo;

#[cfg(test)]
pub(crate) mod test_support;

pub use account_repo::DieselAccountRepository;
pub use cart_repo::DieselCartRepository;
pub use catalog_repo::DieselCatalogRepository;
pub use order_repo::DieselOrderRepository;

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::errors::DomainError;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<DieselError> for DomainError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                DomainError::Conflict(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                DomainError::InvalidInput(info.message().to_string())
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Internal(format!("stored document is corrupt: {e}"))
    }
}

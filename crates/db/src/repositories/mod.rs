use commission_core::errors::LedgerError;
use thiserror::Error;

pub mod memory;
pub mod sales;

pub use memory::InMemorySalesLedger;
pub use sales::SqlSalesLedger;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for LedgerError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Database(error) => Self::Storage(error.to_string()),
            RepositoryError::Decode(message) => Self::Decode(message),
        }
    }
}

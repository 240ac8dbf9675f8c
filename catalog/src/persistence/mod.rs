mod filter;
pub mod sqlite;
mod traits;

pub use filter::{Filter, FilterField, FilterValue, MatchMode, ValueKind};
pub use sqlite::{Database, SqliteGameRepository};
pub use traits::GameRepository;

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Game not found: {0}")]
    NotFound(String),
    #[error("Game already exists: {0}")]
    DuplicateKey(String),
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("Corrupt row: {0}")]
    CorruptRow(String),
    #[error("Schema error: {0}")]
    Schema(#[source] sqlx::Error),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] sqlx::Error),
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::StoreUnavailable(e),
            other => Self::Database(other),
        }
    }
}

impl CatalogError {
    /// Map a failed header insert, turning a primary-key clash into
    /// [`CatalogError::DuplicateKey`].
    pub(crate) fn from_insert(e: sqlx::Error, id: &str) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::DuplicateKey(id.to_string())
            }
            _ => e.into(),
        }
    }
}

//! Database-specific error types and conversions.

use gudang_core::error::GudangError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("{entity} conflict: {message}")]
    Conflict { entity: String, message: String },

    #[error("Invalid stored value: {0}")]
    InvalidRow(String),

    #[error("Password hash error: {0}")]
    Hash(String),
}

impl DbError {
    /// Turn a unique-constraint violation into [`DbError::Conflict`];
    /// anything else passes through unchanged.
    pub(crate) fn unique_violation(err: sqlx::Error, entity: &str, message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => DbError::Conflict {
                entity: entity.into(),
                message: message.into(),
            },
            _ => DbError::Sqlx(err),
        }
    }

    pub(crate) fn not_found(entity: &str, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

impl From<DbError> for GudangError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => GudangError::NotFound { entity, id },
            DbError::Conflict { entity, message } => GudangError::Conflict { entity, message },
            DbError::Hash(msg) => GudangError::Crypto(msg),
            other => GudangError::Database(other.to_string()),
        }
    }
}

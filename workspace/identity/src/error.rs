use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::warn;

/// Error types for the identity module
#[derive(Error, Debug)]
pub enum IdentityError {
    /// Invalid input rejected before anything is persisted
    #[error("Validation error: {0}")]
    Validation(String),

    /// A unique constraint was hit (duplicate email, second profile for a user, ...)
    #[error("Uniqueness violation: {0}")]
    UniquenessViolation(String),

    /// The referenced record does not exist
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Error from the password hasher
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// Error from the blob store
    #[error("Blob store error: {0}")]
    Blob(#[from] std::io::Error),

    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(DbErr),
}

impl IdentityError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        IdentityError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, IdentityError::NotFound { .. })
    }
}

// Unique constraint failures are surfaced as their own variant so callers can tell
// a duplicate apart from a broken database.
impl From<DbErr> for IdentityError {
    fn from(error: DbErr) -> Self {
        match error.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                warn!(%detail, "Unique constraint violated");
                IdentityError::UniquenessViolation(detail)
            }
            _ => {
                // Not every driver error code is classified; fall back to the message.
                let message = error.to_string().to_lowercase();
                if message.contains("unique constraint") || message.contains("duplicate key") {
                    warn!(%message, "Unique constraint violated");
                    IdentityError::UniquenessViolation(error.to_string())
                } else {
                    IdentityError::Database(error)
                }
            }
        }
    }
}

/// Type alias for Result with IdentityError
pub type Result<T> = std::result::Result<T, IdentityError>;

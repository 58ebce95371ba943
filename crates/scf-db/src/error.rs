//! Error types for scf-db.

use scf_core::errors::CoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned malformed data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors surfaced by the bootstrap and document read paths.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The configuration document was rejected before any write.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Organization not found: {0}")]
    OrganizationNotFound(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Any storage failure. The surrounding transaction has been rolled back.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<CoreError> for BootstrapError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::NotFound { entity_type, id } => {
                Self::Validation(format!("{entity_type} {id} not found"))
            }
            CoreError::Other(e) => Self::Database(DatabaseError::Other(e)),
        }
    }
}

//! Cross-cutting error types.
//!
//! Storage errors (`DatabaseError`, `BootstrapError`) live in `scf-db`; the
//! HTTP mapping lives in `scf-server` where all crate errors converge.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Input failed validation (missing fields, mismatched organization).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

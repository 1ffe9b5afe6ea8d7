//! Error types for the store crate.
//!
//! Every collaborator failure (missing rows, constraint violations, I/O on
//! snapshots) is reported through `StoreError`.

use thiserror::Error;

/// Errors returned by a `Store` or `MediaStore`.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Referenced row doesn't exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Unique constraint rejected an insert
    #[error("duplicate {entity}: {key}")]
    Duplicate { entity: &'static str, key: String },

    /// Any other constraint violation (foreign key, wrong tag kind, ...)
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// I/O error while reading or writing snapshots and media
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot couldn't be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend couldn't serve the request
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::Duplicate { .. })
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StoreError>;

//! Error types for plan-store

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Store error types
///
/// Routine reads never produce these: corrupt or missing persisted data
/// falls back to a caller-supplied default. Errors only surface at the
/// import/export boundary, where the user explicitly handed us a document.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Plan not found in the persisted collection
    #[error("Plan not found: {0}")]
    PlanNotFound(String),

    /// Backup document did not parse or had an unusable shape
    #[error("Malformed backup document: {0}")]
    MalformedBackup(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

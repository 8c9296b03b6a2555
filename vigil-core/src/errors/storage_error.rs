//! Persistence errors surfaced to the audit orchestrator.

/// Errors raised by the SQLite persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Serialization error for {what}: {message}")]
    Serialization { what: String, message: String },

    #[error("{what} not found: {id}")]
    NotFound { what: String, id: String },
}

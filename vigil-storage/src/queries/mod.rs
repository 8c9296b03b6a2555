//! Typed queries per table family. All functions take a borrowed
//! connection so callers control transactions.

pub mod dpa;
pub mod findings;
pub mod overrides;
pub mod transcripts;

mod parse;

pub use findings::{AuditRunRow, FindingRow};

pub(crate) fn sqlite_err(e: rusqlite::Error) -> vigil_core::errors::StorageError {
    vigil_core::errors::StorageError::SqliteError {
        message: e.to_string(),
    }
}

//! Connection pragmas for the writer and read-only connections.

use rusqlite::Connection;
use vigil_core::errors::StorageError;

/// Apply write-connection pragmas: WAL journaling, normal sync, foreign
/// keys, and a busy timeout so concurrent auditors queue instead of
/// failing.
pub fn apply_pragmas(conn: &Connection) -> Result<(), StorageError> {
    // journal_mode returns the resulting mode as a row; use query_row.
    conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
        .map_err(sqlite_err)?;
    conn.execute_batch(
        "PRAGMA synchronous = NORMAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;",
    )
    .map_err(sqlite_err)?;
    Ok(())
}

/// Apply read-connection pragmas.
pub fn apply_read_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "PRAGMA query_only = ON;
         PRAGMA busy_timeout = 5000;",
    )
    .map_err(sqlite_err)?;
    Ok(())
}

fn sqlite_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

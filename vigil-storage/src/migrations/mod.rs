//! Schema migrations, applied in order and tracked via `user_version`.

pub mod v001_initial;

use rusqlite::Connection;
use vigil_core::errors::StorageError;

/// Ordered list of (version, SQL) migrations.
const MIGRATIONS: &[(i64, &str)] = &[(1, v001_initial::MIGRATION_SQL)];

/// Apply any migrations newer than the database's current version.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let current: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;

    for (version, sql) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        conn.execute_batch(sql)
            .map_err(|e| StorageError::SqliteError {
                message: format!("migration v{version} failed: {e}"),
            })?;
        conn.pragma_update(None, "user_version", version)
            .map_err(|e| StorageError::SqliteError {
                message: e.to_string(),
            })?;
    }
    Ok(())
}

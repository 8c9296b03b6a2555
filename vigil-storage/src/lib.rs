//! vigil-storage: SQLite persistence for transcripts, findings, audit
//! runs, overrides, and DPA telemetry.
//!
//! Transcript id is the natural partition key: one transcript's
//! findings + audit run are written atomically in a single transaction,
//! and no cross-transcript locking exists beyond the serialized writer.

pub mod connection;
pub mod migrations;
pub mod queries;
pub mod store;

pub use connection::DatabaseManager;
pub use store::AuditStore;

//! Pipeline errors. Aggregates subsystem errors via `From` conversions.

use super::{CatalogError, ConfigError, StorageError};

/// Errors that can abort an audit pipeline run.
///
/// Summarizer failures are deliberately absent: they are recovered at
/// the summarizer boundary and never abort an audit.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

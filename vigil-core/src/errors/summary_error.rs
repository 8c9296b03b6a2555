//! Summarizer errors. Fully recovered at the summarizer boundary; they
//! never reach the scorer or alter an audit outcome.

/// Errors raised by an outcome summarizer implementation.
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("Summarizer {provider} is unavailable")]
    Unavailable { provider: String },

    #[error("No API key found in environment variable {env_var}")]
    MissingApiKey { env_var: String },

    #[error("Summary request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("Malformed summary response: {reason}")]
    MalformedResponse { reason: String },
}

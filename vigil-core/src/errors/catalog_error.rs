//! Rule catalog validation errors. A malformed catalog fails loudly at
//! load time so evaluation never sees an invalid rule.

/// Errors raised while loading or validating a rule catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to parse rule catalog: {message}")]
    ParseError { message: String },

    #[error("Duplicate rule id: {id}")]
    DuplicateRuleId { id: String },

    #[error("Rule {id} has non-positive weight {weight}")]
    NonPositiveWeight { id: String, weight: f64 },

    #[error("Rule {id} has an empty phrase set for {language}")]
    EmptyPhraseSet { id: String, language: String },

    #[error("Rule {id} has an invalid detection config: {message}")]
    InvalidDetection { id: String, message: String },

    #[error("Failed to compile phrase matcher for rule {id}: {message}")]
    MatcherBuild { id: String, message: String },
}

//! TEXT-column <-> enum mapping. Unknown values are data corruption and
//! surface as serialization errors, never panics.

use vigil_core::errors::StorageError;
use vigil_core::model::{Language, Persona, RiskLevel, Severity, SeverityBand};

fn unknown(what: &str, value: &str) -> StorageError {
    StorageError::Serialization {
        what: what.to_string(),
        message: format!("unknown value '{value}'"),
    }
}

pub fn persona(value: &str) -> Result<Persona, StorageError> {
    match value {
        "collections" => Ok(Persona::Collections),
        "ram" => Ok(Persona::Ram),
        other => Err(unknown("persona", other)),
    }
}

pub fn language(value: &str) -> Result<Language, StorageError> {
    match value {
        "en" => Ok(Language::En),
        "es" => Ok(Language::Es),
        other => Err(unknown("language", other)),
    }
}

pub fn language_str(value: Language) -> &'static str {
    match value {
        Language::En => "en",
        Language::Es => "es",
    }
}

pub fn risk_level(value: &str) -> Result<RiskLevel, StorageError> {
    match value {
        "good" => Ok(RiskLevel::Good),
        "moderate" => Ok(RiskLevel::Moderate),
        "high" => Ok(RiskLevel::High),
        "critical" => Ok(RiskLevel::Critical),
        other => Err(unknown("risk level", other)),
    }
}

pub fn risk_level_str(value: RiskLevel) -> &'static str {
    match value {
        RiskLevel::Good => "good",
        RiskLevel::Moderate => "moderate",
        RiskLevel::High => "high",
        RiskLevel::Critical => "critical",
    }
}

pub fn severity(value: &str) -> Result<Severity, StorageError> {
    match value {
        "low" => Ok(Severity::Low),
        "moderate" => Ok(Severity::Moderate),
        "high" => Ok(Severity::High),
        "critical" => Ok(Severity::Critical),
        other => Err(unknown("severity", other)),
    }
}

pub fn band(value: &str) -> Result<SeverityBand, StorageError> {
    match value {
        "good" => Ok(SeverityBand::Good),
        "moderate" => Ok(SeverityBand::Moderate),
        "high" => Ok(SeverityBand::High),
        "critical" => Ok(SeverityBand::Critical),
        other => Err(unknown("severity band", other)),
    }
}

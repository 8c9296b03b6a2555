//! Rule catalog: load, validate loudly, serve rules per persona.

pub mod builtin;
pub mod types;

use rustc_hash::FxHashSet;
use serde::Deserialize;
use vigil_core::config::AuditConfig;
use vigil_core::errors::CatalogError;
use vigil_core::model::Persona;

pub use types::{AppliesTo, Detection, PhraseSet, Rule, RuleCategory};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "rule")]
    rules: Vec<Rule>,
}

/// A validated, ordered set of rules. Invalid catalogs never construct:
/// duplicate ids, non-positive weights, and empty phrase sets fail here,
/// not at evaluation time.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
}

impl RuleCatalog {
    /// Validate and wrap a rule list.
    pub fn new(rules: Vec<Rule>) -> Result<Self, CatalogError> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for rule in &rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(CatalogError::DuplicateRuleId {
                    id: rule.id.clone(),
                });
            }
            if !(rule.weight > 0.0) || !rule.weight.is_finite() {
                return Err(CatalogError::NonPositiveWeight {
                    id: rule.id.clone(),
                    weight: rule.weight,
                });
            }
            validate_detection(rule)?;
        }
        Ok(Self { rules })
    }

    /// The builtin catalog; process thresholds come from configuration.
    pub fn builtin(config: &AuditConfig) -> Result<Self, CatalogError> {
        Self::new(builtin::rules(&config.process))
    }

    /// Parse a catalog from TOML text.
    pub fn from_toml(toml_str: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            toml::from_str(toml_str).map_err(|e| CatalogError::ParseError {
                message: e.to_string(),
            })?;
        Self::new(file.rules)
    }

    /// Load per configuration: a custom catalog file when configured,
    /// the builtin catalog otherwise.
    pub fn load(config: &AuditConfig) -> Result<Self, CatalogError> {
        match &config.catalog_path {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|e| CatalogError::ParseError {
                        message: format!("cannot read {path}: {e}"),
                    })?;
                Self::from_toml(&content)
            }
            None => Self::builtin(config),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rules applicable to a persona within a category, in catalog order.
    pub fn rules_for(&self, persona: Persona, category: RuleCategory) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|r| r.category() == category && r.applies_to.includes(persona))
            .collect()
    }
}

fn validate_detection(rule: &Rule) -> Result<(), CatalogError> {
    let check_phrases = |set: &PhraseSet| -> Result<(), CatalogError> {
        if set.en.is_empty() || set.en.iter().any(String::is_empty) {
            return Err(CatalogError::EmptyPhraseSet {
                id: rule.id.clone(),
                language: "en".to_string(),
            });
        }
        if set.es.is_empty() || set.es.iter().any(String::is_empty) {
            return Err(CatalogError::EmptyPhraseSet {
                id: rule.id.clone(),
                language: "es".to_string(),
            });
        }
        Ok(())
    };

    match &rule.detection {
        Detection::Presence { phrases, .. } => check_phrases(phrases),
        Detection::Ordering { first, then } => {
            check_phrases(first)?;
            check_phrases(then)
        }
        Detection::Lexicon { terms, .. } => check_phrases(terms),
        Detection::IdleRatio { max_ratio } => {
            if !(0.0..=1.0).contains(max_ratio) {
                return Err(CatalogError::InvalidDetection {
                    id: rule.id.clone(),
                    message: format!("max_ratio {max_ratio} outside [0, 1]"),
                });
            }
            Ok(())
        }
        Detection::Dwell { max_dwell_sec } => {
            if *max_dwell_sec <= 0.0 {
                return Err(CatalogError::InvalidDetection {
                    id: rule.id.clone(),
                    message: format!("max_dwell_sec {max_dwell_sec} must be positive"),
                });
            }
            Ok(())
        }
    }
}

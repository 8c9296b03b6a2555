//! Top-level audit configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Process-telemetry thresholds consumed by the process rules and the
/// DPA reduction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// `high_idle_ratio` fails above this fraction of call duration.
    pub max_idle_ratio: f64,
    /// `high_dwell` fails above this many seconds on a single screen.
    pub max_dwell_sec: f64,
    /// Activity window after an event; the remainder of a longer gap
    /// between events counts as idle.
    pub gap_threshold_sec: f64,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            max_idle_ratio: 0.25,
            max_dwell_sec: 300.0,
            gap_threshold_sec: 30.0,
        }
    }
}

/// Scoring and report thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// A transcript is actionable when its latest score reaches this
    /// value or the run carries a critical finding.
    pub score_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            score_threshold: 70.0,
        }
    }
}

/// Evaluator presentation limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Snippets quoted into findings are truncated to this many chars.
    pub snippet_max_chars: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            snippet_max_chars: 160,
        }
    }
}

/// Outcome-summary (LLM) settings. The summarizer is optional; when
/// disabled or failing, the deterministic rule-based fallback is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub max_retries: u32,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            max_retries: 3,
        }
    }
}

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`VIGIL_*`)
/// 2. Project config (`vigil.toml` in project root)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuditConfig {
    pub process: ProcessConfig,
    pub scoring: ScoringConfig,
    pub evaluator: EvaluatorConfig,
    pub summary: SummaryConfig,
    /// Path to a custom rule catalog TOML; the builtin catalog is used
    /// when absent.
    pub catalog_path: Option<String>,
}

impl AuditConfig {
    /// Load configuration with layered resolution and validate the
    /// merged result.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_path = root.join("vigil.toml");
        if project_path.exists() {
            let content = std::fs::read_to_string(&project_path).map_err(|_| {
                ConfigError::FileNotFound {
                    path: project_path.display().to_string(),
                }
            })?;
            config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: project_path.display().to_string(),
                message: e.to_string(),
            })?;
        }

        Self::apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.process.max_idle_ratio) {
            return Err(ConfigError::ValidationFailed {
                field: "process.max_idle_ratio".to_string(),
                message: "must be between 0.0 and 1.0".to_string(),
            });
        }
        if self.process.max_dwell_sec <= 0.0 {
            return Err(ConfigError::ValidationFailed {
                field: "process.max_dwell_sec".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.process.gap_threshold_sec < 0.0 {
            return Err(ConfigError::ValidationFailed {
                field: "process.gap_threshold_sec".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        if !(0.0..=100.0).contains(&self.scoring.score_threshold) {
            return Err(ConfigError::ValidationFailed {
                field: "scoring.score_threshold".to_string(),
                message: "must be between 0 and 100".to_string(),
            });
        }
        if self.evaluator.snippet_max_chars == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "evaluator.snippet_max_chars".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Apply environment variable overrides.
    /// Pattern: `VIGIL_MAX_IDLE_RATIO`, `VIGIL_SCORE_THRESHOLD`, etc.
    fn apply_env_overrides(config: &mut AuditConfig) {
        if let Ok(val) = std::env::var("VIGIL_MAX_IDLE_RATIO") {
            if let Ok(v) = val.parse::<f64>() {
                config.process.max_idle_ratio = v;
            }
        }
        if let Ok(val) = std::env::var("VIGIL_MAX_DWELL_SEC") {
            if let Ok(v) = val.parse::<f64>() {
                config.process.max_dwell_sec = v;
            }
        }
        if let Ok(val) = std::env::var("VIGIL_SCORE_THRESHOLD") {
            if let Ok(v) = val.parse::<f64>() {
                config.scoring.score_threshold = v;
            }
        }
        if let Ok(val) = std::env::var("VIGIL_SUMMARY_ENABLED") {
            if let Ok(v) = val.parse::<bool>() {
                config.summary.enabled = v;
            }
        }
        if let Ok(val) = std::env::var("VIGIL_SUMMARY_MODEL") {
            config.summary.model = val;
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

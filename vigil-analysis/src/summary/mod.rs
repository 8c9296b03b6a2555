//! Outcome summarizers. The pipeline selects an implementation at
//! construction; a failing summarizer is recovered at this boundary and
//! never changes an audit outcome.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vigil_core::config::SummaryConfig;
use vigil_core::errors::SummaryError;
use vigil_core::model::{Finding, SeverityBand, Transcript};

/// Produces the narrative "reason for outcome" shown with an audit run.
pub trait Summarizer: Send + Sync {
    fn name(&self) -> &'static str;

    fn summarize(
        &self,
        transcript: &Transcript,
        findings: &[Finding],
        band: SeverityBand,
    ) -> Result<String, SummaryError>;
}

fn band_label(band: SeverityBand) -> &'static str {
    match band {
        SeverityBand::Good => "Good",
        SeverityBand::Moderate => "Moderate",
        SeverityBand::High => "High",
        SeverityBand::Critical => "Critical",
    }
}

/// Deterministic fallback: the band plus the failed findings' reasons.
/// Always non-empty, so a stored run never lacks a reason.
pub fn rule_based_summary(findings: &[Finding], band: SeverityBand) -> String {
    let failed: Vec<&str> = findings
        .iter()
        .filter(|f| !f.passed)
        .map(|f| f.reason.as_str())
        .collect();
    if failed.is_empty() {
        format!("{}: no rule failures.", band_label(band))
    } else {
        format!("{}: {}.", band_label(band), failed.join("; "))
    }
}

/// The deterministic summarizer used when no LLM is configured.
pub struct RuleBasedSummarizer;

impl Summarizer for RuleBasedSummarizer {
    fn name(&self) -> &'static str {
        "rule-based"
    }

    fn summarize(
        &self,
        _transcript: &Transcript,
        findings: &[Finding],
        band: SeverityBand,
    ) -> Result<String, SummaryError> {
        Ok(rule_based_summary(findings, band))
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Chat-completions summarizer with retry, exponential backoff, and an
/// availability latch: after exhausting retries the provider reports
/// unavailable until reset instead of stalling every audit.
pub struct ChatSummarizer {
    endpoint: String,
    api_key: String,
    model: String,
    max_retries: u32,
    available: AtomicBool,
}

impl ChatSummarizer {
    /// Build from configuration; the API key is read from the
    /// configured environment variable.
    pub fn from_config(config: &SummaryConfig) -> Result<Self, SummaryError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            SummaryError::MissingApiKey {
                env_var: config.api_key_env.clone(),
            }
        })?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key,
            model: config.model.clone(),
            max_retries: config.max_retries,
            available: AtomicBool::new(true),
        })
    }

    /// Reset availability (e.g. after a config change or health check).
    pub fn reset_availability(&self) {
        self.available.store(true, Ordering::Relaxed);
    }

    fn build_prompt(
        &self,
        transcript: &Transcript,
        findings: &[Finding],
        band: SeverityBand,
    ) -> String {
        let mut lines = Vec::with_capacity(transcript.turns.len());
        for turn in &transcript.turns {
            lines.push(format!(
                "{:?} [{}]: {}",
                turn.speaker,
                turn.segment.as_str(),
                turn.text
            ));
        }
        let context = rule_based_summary(findings, band);
        format!(
            "You are a compliance auditor for an auto finance contact center. \
             Below is a call transcript (persona: {}) and the rule-based audit result.\n\n\
             Rule-based result: {context}\n\n\
             Transcript:\n---\n{}\n---\n\n\
             Write a concise 1-2 sentence reason-for-outcome summary. Start with the \
             severity band ({}). Call out tone (too casual, too strict, or appropriate) \
             and the key compliance points. Respond with ONLY the summary.",
            transcript.persona.as_str(),
            lines.join("\n"),
            band_label(band),
        )
    }

    /// Send the request with retry and exponential backoff.
    fn request_summary(&self, prompt: String) -> Result<String, SummaryError> {
        if !self.available.load(Ordering::Relaxed) {
            return Err(SummaryError::Unavailable {
                provider: self.name().to_string(),
            });
        }

        let body = serde_json::to_string(&ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: 150,
            temperature: 0.3,
        })
        .map_err(|e| SummaryError::RequestFailed {
            reason: format!("JSON serialization error: {e}"),
        })?;

        let mut last_err = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(100 * 2u64.pow(attempt - 1));
                std::thread::sleep(delay);
                debug!(attempt, "retrying summary request");
            }
            match self.send_request(&body) {
                Ok(summary) => return Ok(summary),
                Err(e) => {
                    warn!(attempt, error = %e, "summary request failed");
                    last_err = Some(e);
                }
            }
        }

        self.available.store(false, Ordering::Relaxed);
        Err(last_err.unwrap_or(SummaryError::RequestFailed {
            reason: "all retries exhausted".to_string(),
        }))
    }

    /// One HTTP round trip. The `Summarizer` trait is sync, so the
    /// request runs on a current-thread tokio runtime.
    fn send_request(&self, body: &str) -> Result<String, SummaryError> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SummaryError::RequestFailed {
                reason: format!("runtime error: {e}"),
            })?;

        let client = reqwest::Client::new();
        let endpoint = self.endpoint.clone();
        let api_key = self.api_key.clone();
        let body_owned = body.to_string();

        rt.block_on(async {
            let response = client
                .post(&endpoint)
                .header("Authorization", format!("Bearer {api_key}"))
                .header("Content-Type", "application/json")
                .body(body_owned)
                .send()
                .await
                .map_err(|e| SummaryError::RequestFailed {
                    reason: format!("HTTP error: {e}"),
                })?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(SummaryError::RequestFailed {
                    reason: format!("API returned {status}: {body}"),
                });
            }

            let resp: ChatResponse =
                response
                    .json()
                    .await
                    .map_err(|e| SummaryError::MalformedResponse {
                        reason: format!("JSON parse error: {e}"),
                    })?;

            let summary = resp
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
            if summary.is_empty() {
                return Err(SummaryError::MalformedResponse {
                    reason: "empty completion".to_string(),
                });
            }
            Ok(summary)
        })
    }
}

impl Summarizer for ChatSummarizer {
    fn name(&self) -> &'static str {
        "chat-completions"
    }

    fn summarize(
        &self,
        transcript: &Transcript,
        findings: &[Finding],
        band: SeverityBand,
    ) -> Result<String, SummaryError> {
        let prompt = self.build_prompt(transcript, findings, band);
        self.request_summary(prompt)
    }
}

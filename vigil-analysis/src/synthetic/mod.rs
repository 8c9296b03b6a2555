//! Scenario-driven synthetic transcript generation.
//!
//! Each scenario names the template blocks to assemble and the rule ids
//! it was built to trigger (`expected_findings`, the test oracle).
//! Generation is deterministic: ids derive from the scenario, language,
//! and sequence number.

pub mod templates;

use vigil_core::model::{Language, Persona, RiskLevel, Transcript, Turn};
use xxhash_rust::xxh3::xxh3_64;

use templates::find_block;

/// A synthetic call scenario for one persona.
pub struct Scenario {
    pub id: &'static str,
    pub persona: Persona,
    pub risk: RiskLevel,
    pub languages: &'static [Language],
    greeting: &'static str,
    body: &'static str,
    closing: Option<&'static str>,
    pub expected_findings: &'static [&'static str],
}

const BOTH: &[Language] = &[Language::En, Language::Es];
const EN_ONLY: &[Language] = &[Language::En];

/// The builtin scenario set: both personas at all four risk levels.
pub fn builtin_scenarios() -> &'static [Scenario] {
    &[
        Scenario {
            id: "collections_clean_call",
            persona: Persona::Collections,
            risk: RiskLevel::Good,
            languages: BOTH,
            greeting: "greeting_full",
            body: "body_accurate_recap",
            closing: Some("closing_recap"),
            expected_findings: &[],
        },
        Scenario {
            id: "collections_no_recap",
            persona: Persona::Collections,
            risk: RiskLevel::Moderate,
            languages: BOTH,
            greeting: "greeting_full",
            body: "body_no_recap",
            closing: None,
            expected_findings: &["no_recap_of_arrangement"],
        },
        Scenario {
            id: "collections_aggressive_opening",
            persona: Persona::Collections,
            risk: RiskLevel::High,
            languages: BOTH,
            greeting: "greeting_no_miranda_no_rpv",
            body: "body_aggressive",
            closing: None,
            expected_findings: &[
                "missing_mini_miranda",
                "no_verification_before_discussing_account",
                "aggressive_or_threatening_tone",
                "no_recap_of_arrangement",
            ],
        },
        Scenario {
            id: "collections_third_party_disclosure",
            persona: Persona::Collections,
            risk: RiskLevel::Critical,
            languages: EN_ONLY,
            greeting: "greeting_ok",
            body: "body_third_party_promises",
            closing: None,
            expected_findings: &[
                "third_party_disclosure_violation",
                "promising_outside_policy_authority",
                "missing_mini_miranda",
                "no_recap_of_arrangement",
            ],
        },
        Scenario {
            id: "ram_portal_walkthrough",
            persona: Persona::Ram,
            risk: RiskLevel::Good,
            languages: BOTH,
            greeting: "greeting_full",
            body: "body_portal_recap",
            closing: Some("closing_recap"),
            expected_findings: &[],
        },
        Scenario {
            id: "ram_no_recap",
            persona: Persona::Ram,
            risk: RiskLevel::Moderate,
            languages: BOTH,
            greeting: "greeting_ok",
            body: "body_no_recap",
            closing: None,
            expected_findings: &[
                "no_dealer_verification",
                "no_recap_next_steps",
                "no_confirmation_of_understanding",
                "transactional_tone_harming_relationship",
            ],
        },
        Scenario {
            id: "ram_overpromise",
            persona: Persona::Ram,
            risk: RiskLevel::High,
            languages: BOTH,
            greeting: "greeting_full",
            body: "body_overpromise",
            closing: None,
            expected_findings: &[
                "overpromising_turnaround_time",
                "no_recap_next_steps",
                "no_confirmation_of_understanding",
            ],
        },
        Scenario {
            id: "ram_policy_bypass",
            persona: Persona::Ram,
            risk: RiskLevel::Critical,
            languages: BOTH,
            greeting: "greeting_full",
            body: "body_wrong_docs_bypass",
            closing: None,
            expected_findings: &[
                "advising_policy_bypass",
                "no_recap_next_steps",
                "no_confirmation_of_understanding",
            ],
        },
    ]
}

fn language_tag(language: Language) -> &'static str {
    match language {
        Language::En => "en",
        Language::Es => "es",
    }
}

/// Assemble one transcript from a scenario. `sequence` distinguishes
/// repeated generations of the same scenario.
pub fn generate_transcript(
    scenario: &Scenario,
    language: Language,
    sequence: u32,
    created_at: u64,
) -> Transcript {
    let mut turns = Vec::new();
    let mut keys = vec![scenario.greeting, scenario.body];
    if let Some(closing) = scenario.closing {
        keys.push(closing);
    }
    for key in keys {
        if let Some(block) = find_block(scenario.persona, language, key) {
            for (speaker, text) in block.turns {
                turns.push(Turn::new(*speaker, block.segment, *text));
            }
        }
    }

    let tag = language_tag(language);
    let discriminator = xxh3_64(format!("{}:{tag}:{sequence}", scenario.id).as_bytes());
    Transcript {
        id: format!("{}-{tag}-{discriminator:08x}", scenario.id),
        persona: scenario.persona,
        language,
        intended_risk_level: scenario.risk,
        scenario_id: scenario.id.to_string(),
        expected_findings: scenario
            .expected_findings
            .iter()
            .map(|s| s.to_string())
            .collect(),
        turns,
        created_at,
    }
}

/// Generate every builtin scenario in every language it supports.
pub fn generate_all(created_at: u64) -> Vec<Transcript> {
    let mut out = Vec::new();
    for scenario in builtin_scenarios() {
        for language in scenario.languages {
            out.push(generate_transcript(scenario, *language, 0, created_at));
        }
    }
    out
}

//! Builtin rule catalog for the Collections and RAM personas.
//!
//! Pure configuration data. Process thresholds are injected from
//! `ProcessConfig`; everything else is fixed phrase data.

use vigil_core::config::ProcessConfig;
use vigil_core::model::{Persona, Segment, Severity, Speaker};

use super::types::{AppliesTo, Detection, PhraseSet, Rule};

fn ps(en: &[&str], es: &[&str]) -> PhraseSet {
    PhraseSet {
        en: en.iter().map(|s| s.to_string()).collect(),
        es: es.iter().map(|s| s.to_string()).collect(),
    }
}

fn collections() -> AppliesTo {
    AppliesTo::Personas(vec![Persona::Collections])
}

fn ram() -> AppliesTo {
    AppliesTo::Personas(vec![Persona::Ram])
}

/// The full builtin rule set, in evaluation order.
pub fn rules(process: &ProcessConfig) -> Vec<Rule> {
    vec![
        // ─── Collections ─────────────────────────────────────────────
        Rule {
            id: "missing_mini_miranda".to_string(),
            applies_to: collections(),
            severity: Severity::High,
            weight: 20.0,
            description: "Mini-Miranda disclosure missing from the greeting".to_string(),
            detection: Detection::Presence {
                speaker: Some(Speaker::Agent),
                segment: Some(Segment::Greeting),
                phrases: ps(
                    &["collect a debt", "attempt to collect"],
                    &["cobrar una deuda", "comunicación para cobrar"],
                ),
                forbidden: false,
            },
        },
        Rule {
            id: "no_verification_before_discussing_account".to_string(),
            applies_to: collections(),
            severity: Severity::High,
            weight: 20.0,
            description: "Account details discussed before right-party verification".to_string(),
            detection: Detection::Ordering {
                first: ps(
                    &["last four", "social", "date of birth", "verify", "confirm"],
                    &[
                        "últimos cuatro",
                        "seguro social",
                        "fecha de nacimiento",
                        "verificar",
                        "confirmar",
                    ],
                ),
                then: ps(
                    &["balance is", "past due"],
                    &["saldo es", "días de atraso"],
                ),
            },
        },
        Rule {
            id: "no_recap_of_arrangement".to_string(),
            applies_to: collections(),
            severity: Severity::Moderate,
            weight: 10.0,
            description: "Payment arrangement not recapped back to the customer".to_string(),
            detection: Detection::Presence {
                speaker: Some(Speaker::Agent),
                segment: None,
                phrases: ps(
                    &["to confirm", "to summarize", "recap"],
                    &["para confirmar", "resumen", "quedan"],
                ),
                forbidden: false,
            },
        },
        Rule {
            id: "aggressive_or_threatening_tone".to_string(),
            applies_to: collections(),
            severity: Severity::High,
            weight: 15.0,
            description: "Aggressive or threatening language toward the customer".to_string(),
            detection: Detection::Lexicon {
                speaker: Speaker::Agent,
                terms: ps(
                    &[
                        "repossession",
                        "pay now",
                        "don't miss it",
                        "what are you going to do",
                    ],
                    &["no falle", "enviamos a recuperación", "qué va a hacer"],
                ),
                max_turns: 0,
            },
        },
        Rule {
            id: "misstating_balance_or_fees".to_string(),
            applies_to: collections(),
            severity: Severity::Moderate,
            weight: 10.0,
            description: "Customer contradicts the stated balance or fees".to_string(),
            detection: Detection::Presence {
                speaker: None,
                segment: None,
                phrases: ps(
                    &["i thought it was", "thought it was"],
                    &["pensé que era"],
                ),
                forbidden: true,
            },
        },
        Rule {
            id: "third_party_disclosure_violation".to_string(),
            applies_to: collections(),
            severity: Severity::Critical,
            weight: 25.0,
            description: "Account details discussed with a third party".to_string(),
            detection: Detection::Presence {
                speaker: None,
                segment: None,
                phrases: ps(
                    &["calling for my", "what he owes", "what she owes"],
                    &["llamo por mi hermano", "cuánto debe él"],
                ),
                forbidden: true,
            },
        },
        Rule {
            id: "promising_outside_policy_authority".to_string(),
            applies_to: collections(),
            severity: Severity::High,
            weight: 15.0,
            description: "Fee waivers or exceptions promised without authority".to_string(),
            detection: Detection::Presence {
                speaker: Some(Speaker::Agent),
                segment: None,
                phrases: ps(
                    &["waive", "i might be able to", "make an exception"],
                    &["condonar", "podría hacer una excepción"],
                ),
                forbidden: true,
            },
        },
        // ─── RAM ─────────────────────────────────────────────────────
        Rule {
            id: "no_dealer_verification".to_string(),
            applies_to: ram(),
            severity: Severity::Moderate,
            weight: 10.0,
            description: "Dealer identity not verified in the greeting".to_string(),
            detection: Detection::Presence {
                speaker: Some(Speaker::Agent),
                segment: Some(Segment::Greeting),
                phrases: ps(
                    &["dealer id", "confirm"],
                    &["id de concesionario", "confirma"],
                ),
                forbidden: false,
            },
        },
        Rule {
            id: "advising_policy_bypass".to_string(),
            applies_to: ram(),
            severity: Severity::Critical,
            weight: 25.0,
            description: "Agent advises bypassing documentation policy".to_string(),
            detection: Detection::Presence {
                speaker: Some(Speaker::Agent),
                segment: None,
                phrases: ps(
                    &["work around", "workaround", "we've made exceptions", "skip the"],
                    &["ha habido excepciones", "se puede omitir", "saltarnos"],
                ),
                forbidden: true,
            },
        },
        Rule {
            id: "contradicting_underwriting_rules".to_string(),
            applies_to: ram(),
            severity: Severity::High,
            weight: 20.0,
            description: "Agent contradicts stated underwriting rules".to_string(),
            detection: Detection::Presence {
                speaker: Some(Speaker::Agent),
                segment: None,
                phrases: ps(
                    &["they say that but", "we've approved higher", "push it through"],
                    &["hemos aprobado más alto", "insista y lo vemos"],
                ),
                forbidden: true,
            },
        },
        Rule {
            id: "overpromising_turnaround_time".to_string(),
            applies_to: ram(),
            severity: Severity::Moderate,
            weight: 10.0,
            description: "Unqualified same-day turnaround promised".to_string(),
            detection: Detection::Presence {
                speaker: Some(Speaker::Agent),
                segment: None,
                phrases: ps(
                    &["end of day today", "by today"],
                    &["hoy mismo", "para hoy"],
                ),
                forbidden: true,
            },
        },
        Rule {
            id: "no_confirmation_of_understanding".to_string(),
            applies_to: ram(),
            severity: Severity::Low,
            weight: 5.0,
            description: "Agent never confirms the dealer understood the guidance".to_string(),
            detection: Detection::Presence {
                speaker: Some(Speaker::Agent),
                segment: None,
                phrases: ps(
                    &["did that work", "do you see", "does that make sense", "understand"],
                    &["le apareció", "funciona", "entendió"],
                ),
                forbidden: false,
            },
        },
        Rule {
            id: "no_recap_next_steps".to_string(),
            applies_to: ram(),
            severity: Severity::Moderate,
            weight: 10.0,
            description: "Next steps not recapped for the dealer".to_string(),
            detection: Detection::Presence {
                speaker: Some(Speaker::Agent),
                segment: None,
                phrases: ps(
                    &["next step", "to summarize"],
                    &["próximos pasos", "resumen"],
                ),
                forbidden: false,
            },
        },
        Rule {
            id: "transactional_tone_harming_relationship".to_string(),
            applies_to: ram(),
            severity: Severity::Low,
            weight: 5.0,
            description: "Abrupt, transactional close with a relationship dealer".to_string(),
            detection: Detection::Presence {
                speaker: Some(Speaker::Agent),
                segment: None,
                phrases: ps(&["okay, bye", "okay bye"], &["de acuerdo. adiós"]),
                forbidden: true,
            },
        },
        // ─── Shared tone guardrails ──────────────────────────────────
        Rule {
            id: "has_greeting".to_string(),
            applies_to: AppliesTo::All,
            severity: Severity::Low,
            weight: 5.0,
            description: "Call opens with a professional greeting".to_string(),
            detection: Detection::Presence {
                speaker: Some(Speaker::Agent),
                segment: Some(Segment::Greeting),
                phrases: ps(
                    &["thank you for calling", "this is"],
                    &["gracias por llamar", "soy", "con "],
                ),
                forbidden: false,
            },
        },
        Rule {
            id: "tone_too_casual".to_string(),
            applies_to: AppliesTo::All,
            severity: Severity::Low,
            weight: 5.0,
            description: "Unprofessional or overly casual language".to_string(),
            detection: Detection::Lexicon {
                speaker: Speaker::Agent,
                terms: ps(
                    &[
                        "dude",
                        "yeah man",
                        "no worries",
                        "gonna",
                        "wanna",
                        "gotta",
                        "kinda",
                        "awesome",
                        "totally",
                        "sure thing",
                    ],
                    &["no problemo", "tranquilo", "dale pues"],
                ),
                max_turns: 0,
            },
        },
        Rule {
            id: "tone_too_strict".to_string(),
            applies_to: AppliesTo::All,
            severity: Severity::Low,
            weight: 5.0,
            description: "Harsh, cold, or intimidating language".to_string(),
            detection: Detection::Lexicon {
                speaker: Speaker::Agent,
                terms: ps(
                    &[
                        "you need to",
                        "you must",
                        "no excuses",
                        "listen here",
                        "or else",
                        "last chance",
                    ],
                    &["tiene que", "ahora mismo", "sin excusas"],
                ),
                max_turns: 0,
            },
        },
        // ─── Process ─────────────────────────────────────────────────
        Rule {
            id: "high_idle_ratio".to_string(),
            applies_to: AppliesTo::All,
            severity: Severity::Moderate,
            weight: 10.0,
            description: "Idle time is a high fraction of the call".to_string(),
            detection: Detection::IdleRatio {
                max_ratio: process.max_idle_ratio,
            },
        },
        Rule {
            id: "high_dwell".to_string(),
            applies_to: AppliesTo::All,
            severity: Severity::Moderate,
            weight: 10.0,
            description: "Agent stuck on a single screen too long".to_string(),
            detection: Detection::Dwell {
                max_dwell_sec: process.max_dwell_sec,
            },
        },
    ]
}

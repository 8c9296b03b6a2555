//! Transcript evaluator behavior: the three detection strategies,
//! persona and segment scoping, snippets, and symmetric reasons.

use vigil_analysis::catalog::{AppliesTo, Detection, PhraseSet, Rule, RuleCatalog};
use vigil_analysis::evaluate::TranscriptEvaluator;
use vigil_core::config::EvaluatorConfig;
use vigil_core::model::{
    Finding, Language, Persona, RiskLevel, Segment, Severity, Speaker, Transcript, Turn,
};

fn ps(en: &[&str], es: &[&str]) -> PhraseSet {
    PhraseSet {
        en: en.iter().map(|s| s.to_string()).collect(),
        es: es.iter().map(|s| s.to_string()).collect(),
    }
}

fn transcript(language: Language, turns: Vec<Turn>) -> Transcript {
    Transcript {
        id: "t-1".to_string(),
        persona: Persona::Collections,
        language,
        intended_risk_level: RiskLevel::Good,
        scenario_id: "fixture".to_string(),
        expected_findings: vec![],
        turns,
        created_at: 0,
    }
}

fn evaluator(rules: Vec<Rule>) -> TranscriptEvaluator {
    let catalog = RuleCatalog::new(rules).unwrap();
    TranscriptEvaluator::new(&catalog, &EvaluatorConfig::default()).unwrap()
}

fn rule(id: &str, detection: Detection) -> Rule {
    Rule {
        id: id.to_string(),
        applies_to: AppliesTo::All,
        severity: Severity::Moderate,
        weight: 10.0,
        description: "fixture rule".to_string(),
        detection,
    }
}

#[test]
fn required_presence_passes_and_fails() {
    let eval = evaluator(vec![rule(
        "greeting_required",
        Detection::Presence {
            speaker: Some(Speaker::Agent),
            segment: Some(Segment::Greeting),
            phrases: ps(&["thank you for calling"], &["gracias por llamar"]),
            forbidden: false,
        },
    )]);

    let good = transcript(
        Language::En,
        vec![Turn::new(
            Speaker::Agent,
            Segment::Greeting,
            "Thank You for calling Premier.",
        )],
    );
    let findings = eval.evaluate(&good);
    assert_eq!(findings.len(), 1);
    assert!(findings[0].passed);
    // Passed findings still carry a reason and the matched evidence.
    assert!(findings[0].reason.contains("required phrase"));
    assert!(findings[0].reason.contains("segment greeting"));
    assert!(findings[0].snippet.is_some());

    let bad = transcript(
        Language::En,
        vec![Turn::new(Speaker::Agent, Segment::Greeting, "Yes?")],
    );
    let findings = eval.evaluate(&bad);
    assert!(!findings[0].passed);
    assert_eq!(
        findings[0].reason,
        "no required phrase found in segment greeting"
    );
    assert!(findings[0].snippet.is_none());
}

#[test]
fn forbidden_presence_flags_the_matching_turn() {
    let eval = evaluator(vec![rule(
        "no_threats",
        Detection::Presence {
            speaker: Some(Speaker::Agent),
            segment: None,
            phrases: ps(&["repossession"], &["recuperación"]),
            forbidden: true,
        },
    )]);

    let t = transcript(
        Language::En,
        vec![
            Turn::new(Speaker::Customer, Segment::Negotiation, "What happens now?"),
            Turn::new(
                Speaker::Agent,
                Segment::Negotiation,
                "We're sending this to Repossession today.",
            ),
        ],
    );
    let findings = eval.evaluate(&t);
    assert!(!findings[0].passed);
    assert!(findings[0].reason.contains("forbidden phrase \"repossession\""));
    assert_eq!(
        findings[0].snippet.as_deref(),
        Some("We're sending this to Repossession today.")
    );

    // Customer saying it is not a violation: the rule scopes to agent.
    let customer_only = transcript(
        Language::En,
        vec![Turn::new(
            Speaker::Customer,
            Segment::Negotiation,
            "Is repossession on the table?",
        )],
    );
    assert!(eval.evaluate(&customer_only)[0].passed);
}

#[test]
fn segment_scoped_rule_without_segment_is_inapplicable() {
    let eval = evaluator(vec![rule(
        "verification_step",
        Detection::Presence {
            speaker: Some(Speaker::Agent),
            segment: Some(Segment::Verification),
            phrases: ps(&["last four"], &["últimos cuatro"]),
            forbidden: false,
        },
    )]);

    // No verification segment anywhere: the rule emits no finding at
    // all, so it can never reach the scorer's denominator.
    let t = transcript(
        Language::En,
        vec![
            Turn::new(Speaker::Agent, Segment::Greeting, "Hello."),
            Turn::new(Speaker::Agent, Segment::Closing, "Goodbye."),
        ],
    );
    assert!(eval.evaluate(&t).is_empty());

    // With the segment present but the phrase missing, it fails instead.
    let with_segment = transcript(
        Language::En,
        vec![Turn::new(
            Speaker::Agent,
            Segment::Verification,
            "Can you confirm your address?",
        )],
    );
    let findings = eval.evaluate(&with_segment);
    assert_eq!(findings.len(), 1);
    assert!(!findings[0].passed);
}

#[test]
fn ordering_covers_all_outcomes() {
    let eval = evaluator(vec![rule(
        "verify_before_balance",
        Detection::Ordering {
            first: ps(&["verify", "confirm"], &["verificar"]),
            then: ps(&["balance is"], &["saldo es"]),
        },
    )]);

    let in_order = transcript(
        Language::En,
        vec![
            Turn::new(Speaker::Agent, Segment::Greeting, "Let me verify you first."),
            Turn::new(Speaker::Agent, Segment::Negotiation, "Your balance is $800."),
        ],
    );
    let findings = eval.evaluate(&in_order);
    assert!(findings[0].passed);
    assert!(findings[0].reason.contains("precedes"));

    let out_of_order = transcript(
        Language::En,
        vec![
            Turn::new(Speaker::Agent, Segment::Greeting, "Your balance is $800."),
            Turn::new(Speaker::Agent, Segment::Negotiation, "Now let me verify you."),
        ],
    );
    let findings = eval.evaluate(&out_of_order);
    assert!(!findings[0].passed);
    assert!(findings[0].reason.contains("\"balance is\" occurs before"));
    assert_eq!(findings[0].snippet.as_deref(), Some("Your balance is $800."));

    let never_verified = transcript(
        Language::En,
        vec![Turn::new(
            Speaker::Agent,
            Segment::Greeting,
            "The balance is $800.",
        )],
    );
    let findings = eval.evaluate(&never_verified);
    assert!(!findings[0].passed);
    assert!(findings[0].reason.contains("no required preceding phrase"));

    let nothing_disclosed = transcript(
        Language::En,
        vec![Turn::new(Speaker::Agent, Segment::Greeting, "Hello there.")],
    );
    let findings = eval.evaluate(&nothing_disclosed);
    assert!(findings[0].passed);
    assert_eq!(findings[0].reason, "gated phrase never occurs");
}

#[test]
fn same_turn_ordering_compares_byte_offsets() {
    let eval = evaluator(vec![rule(
        "verify_before_balance",
        Detection::Ordering {
            first: ps(&["verify"], &["verificar"]),
            then: ps(&["balance is"], &["saldo es"]),
        },
    )]);

    let t = transcript(
        Language::En,
        vec![Turn::new(
            Speaker::Agent,
            Segment::Greeting,
            "I'll verify you, then your balance is next.",
        )],
    );
    assert!(eval.evaluate(&t)[0].passed);
}

#[test]
fn lexicon_counts_turns_not_occurrences() {
    let eval = evaluator(vec![rule(
        "tone",
        Detection::Lexicon {
            speaker: Speaker::Agent,
            terms: ps(&["pay now", "or else"], &["ahora mismo"]),
            max_turns: 1,
        },
    )]);

    // Two terms in one turn count once; within threshold.
    let one_turn = transcript(
        Language::En,
        vec![Turn::new(
            Speaker::Agent,
            Segment::Negotiation,
            "Pay now or else.",
        )],
    );
    let findings = eval.evaluate(&one_turn);
    assert!(findings[0].passed);
    assert_eq!(findings[0].reason, "1 flagged turns within threshold 1");

    let two_turns = transcript(
        Language::En,
        vec![
            Turn::new(Speaker::Agent, Segment::Negotiation, "Pay now."),
            Turn::new(Speaker::Customer, Segment::Negotiation, "Pay now?"),
            Turn::new(Speaker::Agent, Segment::Closing, "Or else."),
        ],
    );
    let findings = eval.evaluate(&two_turns);
    assert!(!findings[0].passed);
    assert_eq!(findings[0].reason, "2 flagged turns exceed threshold 1");
    assert_eq!(findings[0].snippet.as_deref(), Some("Pay now."));
}

#[test]
fn language_selects_the_phrase_set() {
    let eval = evaluator(vec![rule(
        "greeting_required",
        Detection::Presence {
            speaker: None,
            segment: None,
            phrases: ps(&["thank you"], &["gracias"]),
            forbidden: false,
        },
    )]);

    let es = transcript(
        Language::Es,
        vec![Turn::new(Speaker::Agent, Segment::Greeting, "Gracias por llamar.")],
    );
    assert!(eval.evaluate(&es)[0].passed);

    // English phrase in a Spanish transcript does not count.
    let es_with_english = transcript(
        Language::Es,
        vec![Turn::new(Speaker::Agent, Segment::Greeting, "Thank you!")],
    );
    assert!(!eval.evaluate(&es_with_english)[0].passed);
}

#[test]
fn persona_restriction_skips_rules() {
    let mut restricted = rule(
        "ram_only",
        Detection::Presence {
            speaker: None,
            segment: None,
            phrases: ps(&["dealer id"], &["id de concesionario"]),
            forbidden: false,
        },
    );
    restricted.applies_to = AppliesTo::Personas(vec![Persona::Ram]);
    let eval = evaluator(vec![restricted]);

    // Collections transcript: the RAM-only rule emits nothing.
    let t = transcript(
        Language::En,
        vec![Turn::new(Speaker::Agent, Segment::Greeting, "Hello.")],
    );
    assert!(eval.evaluate(&t).is_empty());
}

#[test]
fn snippets_are_truncated_to_the_configured_bound() {
    let catalog = RuleCatalog::new(vec![rule(
        "no_rambling",
        Detection::Presence {
            speaker: None,
            segment: None,
            phrases: ps(&["filler"], &["relleno"]),
            forbidden: true,
        },
    )])
    .unwrap();
    let config = EvaluatorConfig {
        snippet_max_chars: 20,
    };
    let eval = TranscriptEvaluator::new(&catalog, &config).unwrap();

    let long_text = format!("filler {}", "x".repeat(200));
    let t = transcript(
        Language::En,
        vec![Turn::new(Speaker::Agent, Segment::Negotiation, long_text)],
    );
    let findings = eval.evaluate(&t);
    let snippet = findings[0].snippet.as_deref().unwrap();
    assert_eq!(snippet.chars().count(), 21); // 20 chars + ellipsis
    assert!(snippet.ends_with('…'));
}

#[test]
fn findings_copy_rule_weight_and_severity() {
    let mut r = rule(
        "weighted",
        Detection::Presence {
            speaker: None,
            segment: None,
            phrases: ps(&["anything"], &["cualquier"]),
            forbidden: false,
        },
    );
    r.severity = Severity::Critical;
    r.weight = 42.5;
    let eval = evaluator(vec![r]);

    let t = transcript(
        Language::En,
        vec![Turn::new(Speaker::Agent, Segment::Greeting, "Hello.")],
    );
    let findings: Vec<Finding> = eval.evaluate(&t);
    assert_eq!(findings[0].severity, Severity::Critical);
    assert_eq!(findings[0].weight, 42.5);
    assert_eq!(findings[0].rule_id, "weighted");
    assert_eq!(findings[0].transcript_id, "t-1");
}

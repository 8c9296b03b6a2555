//! Transcript evaluator: applies persona-applicable transcript rules to
//! a transcript's turns.

use vigil_core::config::EvaluatorConfig;
use vigil_core::errors::CatalogError;
use vigil_core::model::{Finding, Language, Segment, Speaker, Transcript, Turn};

use super::phrases::PhraseMatcher;
use super::truncate_snippet;
use crate::catalog::{Detection, PhraseSet, Rule, RuleCatalog, RuleCategory};

/// A rule with its phrase sets compiled per language.
struct CompiledRule {
    rule: Rule,
    detection: CompiledDetection,
}

enum CompiledDetection {
    Presence {
        speaker: Option<Speaker>,
        segment: Option<Segment>,
        forbidden: bool,
        matchers: LanguageMatchers,
    },
    Ordering {
        first: LanguageMatchers,
        then: LanguageMatchers,
    },
    Lexicon {
        speaker: Speaker,
        max_turns: u32,
        matchers: LanguageMatchers,
    },
}

struct LanguageMatchers {
    en: PhraseMatcher,
    es: PhraseMatcher,
}

impl LanguageMatchers {
    fn compile(rule_id: &str, set: &PhraseSet) -> Result<Self, CatalogError> {
        Ok(Self {
            en: PhraseMatcher::new(rule_id, &set.en)?,
            es: PhraseMatcher::new(rule_id, &set.es)?,
        })
    }

    fn for_language(&self, language: Language) -> &PhraseMatcher {
        match language {
            Language::En => &self.en,
            Language::Es => &self.es,
        }
    }
}

/// Applies transcript-category rules, restricted to the transcript's
/// persona. Deterministic and side-effect-free: the same transcript and
/// catalog always produce byte-identical findings.
pub struct TranscriptEvaluator {
    rules: Vec<CompiledRule>,
    snippet_max_chars: usize,
}

impl TranscriptEvaluator {
    /// Compile all transcript rules in the catalog. Matcher compilation
    /// failures surface here, at construction, never during evaluation.
    pub fn new(catalog: &RuleCatalog, config: &EvaluatorConfig) -> Result<Self, CatalogError> {
        let mut rules = Vec::new();
        for rule in catalog.rules() {
            if rule.category() != RuleCategory::Transcript {
                continue;
            }
            let detection = match &rule.detection {
                Detection::Presence {
                    speaker,
                    segment,
                    phrases,
                    forbidden,
                } => CompiledDetection::Presence {
                    speaker: *speaker,
                    segment: *segment,
                    forbidden: *forbidden,
                    matchers: LanguageMatchers::compile(&rule.id, phrases)?,
                },
                Detection::Ordering { first, then } => CompiledDetection::Ordering {
                    first: LanguageMatchers::compile(&rule.id, first)?,
                    then: LanguageMatchers::compile(&rule.id, then)?,
                },
                Detection::Lexicon {
                    speaker,
                    terms,
                    max_turns,
                } => CompiledDetection::Lexicon {
                    speaker: *speaker,
                    max_turns: *max_turns,
                    matchers: LanguageMatchers::compile(&rule.id, terms)?,
                },
                Detection::IdleRatio { .. } | Detection::Dwell { .. } => continue,
            };
            rules.push(CompiledRule {
                rule: rule.clone(),
                detection,
            });
        }
        Ok(Self {
            rules,
            snippet_max_chars: config.snippet_max_chars,
        })
    }

    /// Evaluate all applicable rules. Rules scoped to a segment the
    /// transcript does not contain are skipped entirely: they emit no
    /// finding and never reach the scorer.
    pub fn evaluate(&self, transcript: &Transcript) -> Vec<Finding> {
        let mut findings = Vec::new();
        for compiled in &self.rules {
            if !compiled.rule.applies_to.includes(transcript.persona) {
                continue;
            }
            if let Some(verdict) = self.check(compiled, transcript) {
                findings.push(Finding {
                    transcript_id: transcript.id.clone(),
                    rule_id: compiled.rule.id.clone(),
                    passed: verdict.passed,
                    severity: compiled.rule.severity,
                    reason: verdict.reason,
                    snippet: verdict
                        .snippet
                        .map(|s| truncate_snippet(s, self.snippet_max_chars)),
                    weight: compiled.rule.weight,
                });
            }
        }
        findings
    }

    /// Returns `None` when the rule is not applicable to this transcript.
    fn check<'t>(
        &self,
        compiled: &CompiledRule,
        transcript: &'t Transcript,
    ) -> Option<Verdict<'t>> {
        let language = transcript.language;
        match &compiled.detection {
            CompiledDetection::Presence {
                speaker,
                segment,
                forbidden,
                matchers,
            } => {
                if let Some(seg) = segment {
                    if !transcript.has_segment(*seg) {
                        return None;
                    }
                }
                let matcher = matchers.for_language(language);
                let hit = scoped_turns(transcript, *speaker, *segment)
                    .find_map(|turn| {
                        matcher
                            .first_match(&turn.text)
                            .map(|(_, phrase)| (turn, phrase))
                    });
                let scope = scope_label(*segment);
                Some(match (hit, *forbidden) {
                    (Some((turn, phrase)), true) => Verdict::fail(
                        format!("forbidden phrase \"{phrase}\" present{scope}"),
                        Some(&turn.text),
                    ),
                    (None, true) => {
                        Verdict::pass(format!("no disqualifying phrase found{scope}"))
                    }
                    (Some((turn, phrase)), false) => Verdict::pass_with(
                        format!("required phrase \"{phrase}\" present{scope}"),
                        Some(&turn.text),
                    ),
                    (None, false) => {
                        Verdict::fail(format!("no required phrase found{scope}"), None)
                    }
                })
            }
            CompiledDetection::Ordering { first, then } => {
                let first_pos = earliest_match(transcript, first.for_language(language));
                let then_pos = earliest_match(transcript, then.for_language(language));
                Some(match (first_pos, then_pos) {
                    (_, None) => Verdict::pass("gated phrase never occurs".to_string()),
                    (None, Some(b)) => Verdict::fail(
                        format!(
                            "\"{}\" occurs but no required preceding phrase occurs",
                            b.phrase
                        ),
                        Some(&b.turn.text),
                    ),
                    (Some(a), Some(b)) => {
                        if (a.turn_index, a.offset) < (b.turn_index, b.offset) {
                            Verdict::pass(format!(
                                "\"{}\" precedes \"{}\"",
                                a.phrase, b.phrase
                            ))
                        } else {
                            Verdict::fail(
                                format!("\"{}\" occurs before \"{}\"", b.phrase, a.phrase),
                                Some(&b.turn.text),
                            )
                        }
                    }
                })
            }
            CompiledDetection::Lexicon {
                speaker,
                max_turns,
                matchers,
            } => {
                let matcher = matchers.for_language(language);
                let mut count = 0u32;
                let mut evidence: Option<&Turn> = None;
                for turn in scoped_turns(transcript, Some(*speaker), None) {
                    if matcher.is_match(&turn.text) {
                        count += 1;
                        if evidence.is_none() {
                            evidence = Some(turn);
                        }
                    }
                }
                Some(if count > *max_turns {
                    Verdict::fail(
                        format!(
                            "{count} flagged turns exceed threshold {max_turns}"
                        ),
                        evidence.map(|t| t.text.as_str()),
                    )
                } else {
                    Verdict::pass(format!(
                        "{count} flagged turns within threshold {max_turns}"
                    ))
                })
            }
        }
    }
}

struct Verdict<'t> {
    passed: bool,
    reason: String,
    snippet: Option<&'t str>,
}

impl<'t> Verdict<'t> {
    fn pass(reason: String) -> Self {
        Self {
            passed: true,
            reason,
            snippet: None,
        }
    }

    fn pass_with(reason: String, snippet: Option<&'t str>) -> Self {
        Self {
            passed: true,
            reason,
            snippet,
        }
    }

    fn fail(reason: String, snippet: Option<&'t str>) -> Self {
        Self {
            passed: false,
            reason,
            snippet,
        }
    }
}

struct MatchPos<'t, 'm> {
    turn_index: usize,
    offset: usize,
    phrase: &'m str,
    turn: &'t Turn,
}

fn earliest_match<'t, 'm>(
    transcript: &'t Transcript,
    matcher: &'m PhraseMatcher,
) -> Option<MatchPos<'t, 'm>> {
    transcript
        .turns
        .iter()
        .enumerate()
        .find_map(|(turn_index, turn)| {
            matcher.first_match(&turn.text).map(|(offset, phrase)| MatchPos {
                turn_index,
                offset,
                phrase,
                turn,
            })
        })
}

fn scoped_turns<'t>(
    transcript: &'t Transcript,
    speaker: Option<Speaker>,
    segment: Option<Segment>,
) -> impl Iterator<Item = &'t Turn> {
    transcript.turns.iter().filter(move |turn| {
        speaker.map_or(true, |s| turn.speaker == s)
            && segment.map_or(true, |s| turn.segment == s)
    })
}

fn scope_label(segment: Option<Segment>) -> String {
    match segment {
        Some(seg) => format!(" in segment {}", seg.as_str()),
        None => " in transcript".to_string(),
    }
}

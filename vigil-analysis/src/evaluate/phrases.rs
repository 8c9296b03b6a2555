//! Compiled multi-phrase matchers. Each rule's phrase set is compiled
//! once into an Aho-Corasick automaton and matched in a single pass per
//! turn, case-insensitively.

use aho_corasick::AhoCorasick;
use vigil_core::errors::CatalogError;

/// A compiled, case-insensitive phrase set.
pub struct PhraseMatcher {
    ac: AhoCorasick,
    phrases: Vec<String>,
}

impl PhraseMatcher {
    pub fn new(rule_id: &str, phrases: &[String]) -> Result<Self, CatalogError> {
        let ac = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(phrases)
            .map_err(|e| CatalogError::MatcherBuild {
                id: rule_id.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            ac,
            phrases: phrases.to_vec(),
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.ac.is_match(text)
    }

    /// The leftmost match: byte offset and the matched phrase.
    pub fn first_match(&self, text: &str) -> Option<(usize, &str)> {
        self.ac
            .find(text)
            .map(|m| (m.start(), self.phrases[m.pattern().as_usize()].as_str()))
    }
}

//! Intent matcher - whole-word matching of raw messages against the intent table

use regex::{escape, RegexSet, RegexSetBuilder};
use tracing::debug;

use crate::error::Result;
use crate::types::Intent;

/// Compiled intent table.
///
/// Every pattern becomes one case-insensitive `\b...\b` expression in a single
/// `RegexSet`. Patterns are added intent by intent in declaration order, so
/// the lowest matching set index is the first pattern of the first matching
/// intent.
pub struct IntentMatcher {
    intents: Vec<Intent>,
    set: RegexSet,
    // set index -> (intent index, pattern index)
    owners: Vec<(usize, usize)>,
}

impl IntentMatcher {
    pub fn new(intents: Vec<Intent>) -> Result<Self> {
        let mut expressions = Vec::new();
        let mut owners = Vec::new();

        for (intent_idx, intent) in intents.iter().enumerate() {
            intent.validate()?;
            for (pattern_idx, pattern) in intent.patterns.iter().enumerate() {
                expressions.push(format!(r"\b{}\b", escape(pattern.trim())));
                owners.push((intent_idx, pattern_idx));
            }
        }

        let set = RegexSetBuilder::new(&expressions)
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            intents,
            set,
            owners,
        })
    }

    /// Return the first intent with a pattern occurring in `raw` as a whole
    /// word or word sequence.
    pub fn match_intent(&self, raw: &str) -> Option<&Intent> {
        let first = self.set.matches(raw).into_iter().next()?;
        let (intent_idx, pattern_idx) = self.owners[first];
        let intent = &self.intents[intent_idx];

        debug!(
            "Matched intent '{}' via pattern '{}'",
            intent.name, intent.patterns[pattern_idx]
        );
        Some(intent)
    }

    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }
}

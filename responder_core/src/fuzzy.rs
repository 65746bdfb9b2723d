//! Fuzzy fallback - typo-tolerant matching against the known patterns
//!
//! Runs only after every exact stage has missed. Two phases:
//! 1. each token of the message against the single-word vocabulary
//! 2. the whole message against every pattern of every intent

use ahash::AHashMap;
use tracing::debug;

use crate::similarity::closest_match;
use crate::types::{FuzzyMatch, Intent};

/// Default cutoff for the token phase
pub const TOKEN_CUTOFF: f64 = 0.80;
/// Default cutoff for the whole-message phase
pub const MESSAGE_CUTOFF: f64 = 0.75;

pub struct FuzzyMatcher {
    intents: Vec<Intent>,
    /// Single-word patterns in declaration order, without duplicates
    vocabulary: Vec<String>,
    /// Every pattern in declaration order, without duplicates
    phrases: Vec<String>,
    /// pattern -> index of the first intent declaring it
    owners: AHashMap<String, usize>,
    token_cutoff: f64,
    message_cutoff: f64,
}

impl FuzzyMatcher {
    pub fn new(intents: Vec<Intent>) -> Self {
        Self::with_cutoffs(intents, TOKEN_CUTOFF, MESSAGE_CUTOFF)
    }

    pub fn with_cutoffs(intents: Vec<Intent>, token_cutoff: f64, message_cutoff: f64) -> Self {
        let mut vocabulary = Vec::new();
        let mut phrases = Vec::new();
        let mut owners = AHashMap::new();

        for (idx, intent) in intents.iter().enumerate() {
            for pattern in &intent.patterns {
                if owners.contains_key(pattern) {
                    continue;
                }
                owners.insert(pattern.clone(), idx);
                if !pattern.contains(char::is_whitespace) {
                    vocabulary.push(pattern.clone());
                }
                phrases.push(pattern.clone());
            }
        }

        Self {
            intents,
            vocabulary,
            phrases,
            owners,
            token_cutoff,
            message_cutoff,
        }
    }

    /// Find the pattern the user most likely meant.
    ///
    /// `normalized` must already be passed through [`crate::normalize()`].
    pub fn fuzzy_match(&self, normalized: &str) -> Option<FuzzyMatch<'_>> {
        for token in normalized.split_whitespace() {
            let vocab = self.vocabulary.iter().map(String::as_str);
            if let Some((pattern, score)) = closest_match(token, vocab, self.token_cutoff) {
                debug!("Token '{}' is close to '{}' ({:.2})", token, pattern, score);
                return self.resolve(pattern, score);
            }
        }

        let phrases = self.phrases.iter().map(String::as_str);
        let (pattern, score) = closest_match(normalized, phrases, self.message_cutoff)?;
        debug!("Message is close to '{}' ({:.2})", pattern, score);
        self.resolve(pattern, score)
    }

    fn resolve<'a>(&'a self, pattern: &'a str, score: f64) -> Option<FuzzyMatch<'a>> {
        let idx = *self.owners.get(pattern)?;
        Some(FuzzyMatch {
            pattern,
            intent: &self.intents[idx],
            score,
        })
    }

    /// Owning intent of a single-word pattern
    pub fn owner_of(&self, word: &str) -> Option<&Intent> {
        self.owners
            .get(word)
            .filter(|_| !word.contains(char::is_whitespace))
            .map(|&idx| &self.intents[idx])
    }
}

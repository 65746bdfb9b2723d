//! Core data types shared by the matcher, detectors and dispatcher

use serde::{Deserialize, Serialize};

use crate::error::{ResponderError, Result};
use crate::tasks::TaskRef;

/// A named category of user phrasing mapped to a set of canned replies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    pub patterns: Vec<String>,
    pub responses: Vec<String>,
}

impl Intent {
    pub fn new(name: &str, patterns: &[&str], responses: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            responses: responses.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Every intent needs at least one non-blank pattern and one reply.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| ResponderError::InvalidIntent {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.patterns.is_empty() {
            return Err(invalid("no patterns"));
        }
        if self.patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(invalid("blank pattern"));
        }
        if self.responses.is_empty() {
            return Err(invalid("no responses"));
        }
        Ok(())
    }
}

/// A recognised task-list command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoCommand {
    Add(String),
    Show,
    Remove(String),
    Done(TaskRef),
}

/// What one of the feature detectors found in a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    DictionaryQuery(String),
    CalculatorExpression(String),
    Todo(TodoCommand),
}

/// An approximate match produced by the fuzzy fallback
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch<'a> {
    /// The pattern as stored in the intent table
    pub pattern: &'a str,
    pub intent: &'a Intent,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_complete_intent() {
        let intent = Intent::new("greet", &["hi"], &["Hello!"]);
        assert!(intent.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_parts() {
        let no_patterns = Intent::new("empty", &[], &["Hello!"]);
        assert!(matches!(
            no_patterns.validate(),
            Err(ResponderError::InvalidIntent { .. })
        ));

        let no_responses = Intent::new("mute", &["hi"], &[]);
        let err = no_responses.validate().unwrap_err();
        assert_eq!(err.to_string(), "intent 'mute' is invalid: no responses");

        let blank = Intent::new("blank", &["  "], &["Hello!"]);
        assert!(blank.validate().is_err());
    }
}

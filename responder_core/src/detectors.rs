//! Feature detectors - classify a message as a dictionary query, an
//! arithmetic expression or a task-list command
//!
//! Each detector is pure. They run in a fixed order after the intent matcher
//! misses; [`Detectors::classify`] applies that order.

use regex::Regex;

use crate::error::Result;
use crate::tasks::TaskRef;
use crate::types::{Detection, TodoCommand};

/// Compiled expressions for all three detectors
pub struct Detectors {
    dictionary: Vec<Regex>,
    calc_phrasal: Regex,
    calc_disallowed: Regex,
    calc_whole: Regex,
    calc_operator: Regex,
    todo_show: Regex,
    todo_done: Regex,
}

impl Detectors {
    pub fn new() -> Result<Self> {
        let dictionary = [
            r"(?i)meaning of (.+)",
            r"(?i)what does (.+) mean",
            r"(?i)define (.+)",
            r"(?i)definition of (.+)",
        ]
        .iter()
        .map(|p| Regex::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            dictionary,
            calc_phrasal: Regex::new(r"^\s*(?:what\s+is|calculate|solve)\s+(.+)$")?,
            calc_disallowed: Regex::new(r"[^0-9+\-*/%.()\s]")?,
            calc_whole: Regex::new(r"^[0-9+\-*/%.()\s]+$")?,
            calc_operator: Regex::new(r"[+\-*/%]")?,
            todo_show: Regex::new(r"^show tasks?")?,
            todo_done: Regex::new(r"^mark done (\d+)")?,
        })
    }

    /// Run the detectors in order: dictionary on the normalized text,
    /// calculator on the lowercased raw message, todo on the raw message.
    pub fn classify(&self, raw: &str, normalized: &str) -> Option<Detection> {
        if let Some(term) = self.detect_dictionary_query(normalized) {
            return Some(Detection::DictionaryQuery(term));
        }
        if let Some(expr) = self.detect_calculator_expression(&raw.to_lowercase()) {
            return Some(Detection::CalculatorExpression(expr));
        }
        self.detect_todo_command(raw).map(Detection::Todo)
    }

    /// Extract X from "meaning of X", "what does X mean", "define X" or
    /// "definition of X". Only the first matching template is used.
    pub fn detect_dictionary_query(&self, normalized: &str) -> Option<String> {
        self.dictionary.iter().find_map(|re| {
            re.captures(normalized)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|term| !term.is_empty())
        })
    }

    /// Pull an arithmetic expression out of a lowercased message.
    ///
    /// "what is / calculate / solve <rest>" keeps only the arithmetic
    /// characters of `<rest>`; otherwise the whole message must already be
    /// arithmetic. Either way at least one operator is required.
    pub fn detect_calculator_expression(&self, lowercased: &str) -> Option<String> {
        if let Some(caps) = self.calc_phrasal.captures(lowercased) {
            let rest = caps.get(1).map_or("", |m| m.as_str());
            let expr = self.calc_disallowed.replace_all(rest, "");
            let expr = expr.trim();
            if self.calc_operator.is_match(expr) {
                return Some(expr.to_string());
            }
        }

        if self.calc_whole.is_match(lowercased) && self.calc_operator.is_match(lowercased) {
            return Some(lowercased.trim().to_string());
        }

        None
    }

    /// Recognise the fixed task-list grammar:
    /// `add task <title>`, `show task(s)`, `remove task <id|title>`,
    /// `mark done <id>`.
    pub fn detect_todo_command(&self, message: &str) -> Option<TodoCommand> {
        let msg = message.trim().to_lowercase();

        if let Some(title) = msg.strip_prefix("add task ") {
            return Some(TodoCommand::Add(title.trim().to_string()));
        }
        if self.todo_show.is_match(&msg) {
            return Some(TodoCommand::Show);
        }
        if let Some(target) = msg.strip_prefix("remove task ") {
            let target = target.trim();
            return (!target.is_empty()).then(|| TodoCommand::Remove(target.to_string()));
        }
        if msg.starts_with("mark done ") {
            let caps = self.todo_done.captures(&msg)?;
            return Some(TodoCommand::Done(TaskRef::parse(&caps[1])));
        }

        None
    }
}

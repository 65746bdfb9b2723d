//! Dispatcher - runs every stage in priority order and builds the reply
//!
//! Order: blank check → intent patterns → dictionary → calculator → todo →
//! fuzzy match → random fallback. The first stage that recognises the message
//! produces the reply; nothing after it runs.

use rand::seq::SliceRandom;
use tracing::debug;

use crate::calculator::evaluate;
use crate::config::Config;
use crate::detectors::Detectors;
use crate::dictionary::{DictionaryLookup, FreeDictionaryClient, StaticDictionary};
use crate::error::Result;
use crate::fuzzy::FuzzyMatcher;
use crate::intents::{builtin_intents, load_intents, FALLBACK_RESPONSES};
use crate::matcher::IntentMatcher;
use crate::normalize::normalize;
use crate::tasks::{JsonFileBackend, TaskRef, TaskStatus, TaskStore};
use crate::types::{Detection, Intent, TodoCommand};

/// Reply to blank or symbol-only messages
pub const EMPTY_PROMPT: &str = "Please say something so I can help.";

pub struct Responder {
    matcher: IntentMatcher,
    detectors: Detectors,
    fuzzy: FuzzyMatcher,
    dictionary: Box<dyn DictionaryLookup>,
    tasks: TaskStore,
}

impl Responder {
    pub fn new(
        intents: Vec<Intent>,
        dictionary: Box<dyn DictionaryLookup>,
        tasks: TaskStore,
    ) -> Result<Self> {
        Self::with_fuzzy(
            intents.clone(),
            dictionary,
            tasks,
            FuzzyMatcher::new(intents),
        )
    }

    fn with_fuzzy(
        intents: Vec<Intent>,
        dictionary: Box<dyn DictionaryLookup>,
        tasks: TaskStore,
        fuzzy: FuzzyMatcher,
    ) -> Result<Self> {
        Ok(Self {
            matcher: IntentMatcher::new(intents)?,
            detectors: Detectors::new()?,
            fuzzy,
            dictionary,
            tasks,
        })
    }

    /// Build a responder from configuration: intent table, dictionary client,
    /// JSON task file and fuzzy cutoffs.
    pub fn from_config(config: &Config) -> Result<Self> {
        let intents = match &config.intents_file {
            Some(path) => load_intents(path)?,
            None => builtin_intents(),
        };

        let dictionary: Box<dyn DictionaryLookup> = if config.dictionary.enabled {
            Box::new(FreeDictionaryClient::new(
                &config.dictionary.base_url,
                config.dictionary.timeout(),
            )?)
        } else {
            Box::new(StaticDictionary::new())
        };

        let tasks = TaskStore::open(Box::new(JsonFileBackend::new(&config.tasks.path)))?;
        let fuzzy = FuzzyMatcher::with_cutoffs(
            intents.clone(),
            config.matching.token_cutoff,
            config.matching.message_cutoff,
        );

        Self::with_fuzzy(intents, dictionary, tasks, fuzzy)
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    /// Produce the reply for one user message.
    ///
    /// Only task persistence can fail; every other path yields a reply.
    pub fn get_response(&self, message: &str) -> Result<String> {
        if message.trim().is_empty() {
            return Ok(EMPTY_PROMPT.to_string());
        }
        let normalized = normalize(message);
        if normalized.is_empty() {
            return Ok(EMPTY_PROMPT.to_string());
        }

        if let Some(intent) = self.matcher.match_intent(message) {
            return Ok(pick(&intent.responses));
        }

        if let Some(detection) = self.detectors.classify(message, &normalized) {
            return self.handle_detection(detection);
        }

        if let Some(m) = self.fuzzy.fuzzy_match(&normalized) {
            debug!("Fuzzy match '{}' for intent '{}'", m.pattern, m.intent.name);
            return Ok(format!(
                "(Did you mean **{}**?)\n{}",
                m.pattern,
                pick(&m.intent.responses)
            ));
        }

        debug!("No stage matched, using fallback");
        Ok(pick_static(FALLBACK_RESPONSES))
    }

    fn handle_detection(&self, detection: Detection) -> Result<String> {
        match detection {
            Detection::DictionaryQuery(term) => {
                debug!("Dictionary query for '{}'", term);
                Ok(self.dictionary.lookup(&term).unwrap_or_else(|| {
                    format!("Sorry, I couldn't find the meaning of '{}'.", term)
                }))
            }
            Detection::CalculatorExpression(expr) => {
                debug!("Calculator expression '{}'", expr);
                let value = match evaluate(&expr) {
                    Ok(n) => n.to_string(),
                    Err(e) => e.to_string(),
                };
                Ok(format!("The result is: {}", value))
            }
            Detection::Todo(command) => {
                debug!("Todo command {:?}", command);
                self.handle_todo(command)
            }
        }
    }

    fn handle_todo(&self, command: TodoCommand) -> Result<String> {
        match command {
            TodoCommand::Add(title) => self.tasks.add_task(&title),
            TodoCommand::Show => {
                let tasks = self.tasks.get_tasks(None)?;
                if tasks.is_empty() {
                    return Ok("No tasks found.".to_string());
                }
                let lines: Vec<String> = tasks
                    .iter()
                    .map(|task| {
                        let status = match task.status {
                            TaskStatus::Done => "Done",
                            TaskStatus::Pending => "Pending",
                        };
                        format!("{}. [{}] {}", task.id, status, task.title)
                    })
                    .collect();
                Ok(lines.join("\n"))
            }
            TodoCommand::Remove(arg) => self.tasks.remove_task(&TaskRef::parse(&arg)),
            TodoCommand::Done(target) => self.tasks.mark_done(&target),
        }
    }
}

fn pick(replies: &[String]) -> String {
    replies
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_default()
}

fn pick_static(replies: &[&str]) -> String {
    replies
        .choose(&mut rand::thread_rng())
        .map(|r| r.to_string())
        .unwrap_or_default()
}

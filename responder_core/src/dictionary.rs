//! Dictionary lookups for "define X" style questions
//!
//! Lookups never fail loudly: a missing word, a timeout, a network error or an
//! unexpected response body all come back as `None`.

use ahash::AHashMap;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::Result;

/// Public endpoint of the Free Dictionary API
pub const DEFAULT_BASE_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";

pub trait DictionaryLookup: Send + Sync {
    /// First definition of `word`, if one can be found.
    fn lookup(&self, word: &str) -> Option<String>;
}

/// Client for the Free Dictionary API (`GET <base_url>/<word>`)
pub struct FreeDictionaryClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(default)]
    definitions: Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    definition: String,
}

impl FreeDictionaryClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("responder/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn fetch(&self, word: &str) -> std::result::Result<Vec<Entry>, reqwest::Error> {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(word));
        debug!("Looking up '{}' at {}", word, url);
        self.client.get(url).send()?.error_for_status()?.json()
    }
}

impl DictionaryLookup for FreeDictionaryClient {
    fn lookup(&self, word: &str) -> Option<String> {
        match self.fetch(word) {
            Ok(entries) => first_definition(&entries),
            Err(e) => {
                warn!("Dictionary lookup for '{}' failed: {}", word, e);
                None
            }
        }
    }
}

fn first_definition(entries: &[Entry]) -> Option<String> {
    entries
        .first()?
        .meanings
        .first()?
        .definitions
        .first()
        .map(|d| d.definition.clone())
}

/// Fixed in-memory dictionary; empty when lookups are disabled.
#[derive(Debug, Default, Clone)]
pub struct StaticDictionary {
    entries: AHashMap<String, String>,
}

impl StaticDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, word: &str, definition: &str) -> Self {
        self.entries.insert(word.to_lowercase(), definition.to_string());
        self
    }
}

impl DictionaryLookup for StaticDictionary {
    fn lookup(&self, word: &str) -> Option<String> {
        self.entries.get(&word.to_lowercase()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_definition_from_api_body() {
        let body = r#"[
            {
                "word": "umbrella",
                "meanings": [
                    {
                        "partOfSpeech": "noun",
                        "definitions": [
                            {"definition": "A cloth-covered frame used for protection against rain."},
                            {"definition": "Something that covers a wide range."}
                        ]
                    }
                ]
            }
        ]"#;
        let entries: Vec<Entry> = serde_json::from_str(body).unwrap();
        assert_eq!(
            first_definition(&entries).as_deref(),
            Some("A cloth-covered frame used for protection against rain.")
        );
    }

    #[test]
    fn test_malformed_bodies_have_no_definition() {
        let empty: Vec<Entry> = serde_json::from_str("[]").unwrap();
        assert!(first_definition(&empty).is_none());

        let no_meanings: Vec<Entry> = serde_json::from_str(r#"[{"word": "x"}]"#).unwrap();
        assert!(first_definition(&no_meanings).is_none());

        // the API answers unknown words with an object, not a list
        let not_found = r#"{"title": "No Definitions Found"}"#;
        assert!(serde_json::from_str::<Vec<Entry>>(not_found).is_err());
    }

    #[test]
    fn test_unreachable_service_yields_none() {
        // nothing listens on the discard port
        let client =
            FreeDictionaryClient::new("http://127.0.0.1:9/", Duration::from_millis(500)).unwrap();
        assert!(client.lookup("umbrella").is_none());
    }

    #[test]
    fn test_static_dictionary() {
        let dict = StaticDictionary::new().with_entry("Rust", "A reddish-brown iron oxide.");
        assert_eq!(dict.lookup("rust").as_deref(), Some("A reddish-brown iron oxide."));
        assert!(dict.lookup("umbrella").is_none());
    }
}

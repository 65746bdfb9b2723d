//! Responder core - rule-based conversational responder
//!
//! Maps a free-text message to a reply by running, in order: whole-word
//! intent matching, dictionary / calculator / to-do detectors, a fuzzy
//! typo-tolerant fallback, and finally a random fallback reply.

pub mod types;
pub mod error;
pub mod normalize;
pub mod intents;
pub mod similarity;
pub mod matcher;
pub mod detectors;
pub mod fuzzy;
pub mod calculator;
pub mod dictionary;
pub mod tasks;
pub mod config;
pub mod responder;
pub mod server;

pub use types::*;
pub use error::{ResponderError, Result};
pub use normalize::normalize;
pub use matcher::IntentMatcher;
pub use detectors::Detectors;
pub use fuzzy::FuzzyMatcher;
pub use calculator::{evaluate, CalcError, Number};
pub use dictionary::{DictionaryLookup, FreeDictionaryClient, StaticDictionary};
pub use tasks::{JsonFileBackend, MemoryBackend, Task, TaskBackend, TaskRef, TaskStatus, TaskStore};
pub use config::Config;
pub use responder::Responder;

// Python bindings
#[cfg(feature = "extension-module")]
pub mod py;

#[cfg(feature = "extension-module")]
use pyo3::prelude::*;

#[cfg(feature = "extension-module")]
#[pymodule]
fn responder_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use py::*;
    m.add_class::<PyResponder>()?;
    m.add_function(wrap_pyfunction!(py_normalize, m)?)?;
    m.add_function(wrap_pyfunction!(py_evaluate, m)?)?;
    Ok(())
}

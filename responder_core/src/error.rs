//! Error type shared by every module of the responder

use std::path::PathBuf;
use thiserror::Error;

/// Faults that can stop the responder from producing a reply.
///
/// Detector misses and collaborator failures (unknown words, bad arithmetic)
/// are not errors; they become ordinary reply text.
#[derive(Error, Debug)]
pub enum ResponderError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to parse configuration: {source}")]
    ConfigParse {
        #[from]
        source: toml::de::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("failed to compile pattern: {source}")]
    Pattern {
        #[from]
        source: regex::Error,
    },

    #[error("intent '{name}' is invalid: {reason}")]
    InvalidIntent { name: String, reason: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClient {
        #[from]
        source: reqwest::Error,
    },

    #[error("task storage error: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponderError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ResponderError>;

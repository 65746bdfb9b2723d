//! Configuration loaded from `responder.toml`
//!
//! Lookup order:
//! 1. an explicit path (`--config` / `RESPONDER_CONFIG`)
//! 2. `responder.toml` in the working directory, if present
//! 3. built-in defaults
//!
//! Every section and key is optional.

use serde::Deserialize;
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::dictionary::DEFAULT_BASE_URL;
use crate::error::{ResponderError, Result};
use crate::fuzzy::{MESSAGE_CUTOFF, TOKEN_CUTOFF};

pub const DEFAULT_CONFIG_FILE: &str = "responder.toml";

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// TOML file of `[[intents]]` replacing the built-in table
    #[serde(default)]
    pub intents_file: Option<PathBuf>,
    #[serde(default)]
    pub tasks: TasksConfig,
    #[serde(default)]
    pub dictionary: DictionaryConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct TasksConfig {
    #[serde(default = "default_tasks_path")]
    pub path: PathBuf,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct DictionaryConfig {
    /// When false, every lookup reports "not found" without network access
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct MatchingConfig {
    #[serde(default = "default_token_cutoff")]
    pub token_cutoff: f64,
    #[serde(default = "default_message_cutoff")]
    pub message_cutoff: f64,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tasks_path() -> PathBuf {
    PathBuf::from("tasks.json")
}
fn default_true() -> bool {
    true
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    5
}
fn default_token_cutoff() -> f64 {
    TOKEN_CUTOFF
}
fn default_message_cutoff() -> f64 {
    MESSAGE_CUTOFF
}
fn default_host() -> IpAddr {
    IpAddr::from([127, 0, 0, 1])
}
fn default_port() -> u16 {
    5000
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            path: default_tasks_path(),
        }
    }
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            token_cutoff: TOKEN_CUTOFF,
            message_cutoff: MESSAGE_CUTOFF,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl DictionaryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from `path`, or from `responder.toml` in the
    /// working directory, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("No configuration file, using defaults");
                Self::default()
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ResponderError::io(path, e))?;
        let config = Self::from_toml(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, cutoff) in [
            ("matching.token_cutoff", self.matching.token_cutoff),
            ("matching.message_cutoff", self.matching.message_cutoff),
        ] {
            if !(0.0..=1.0).contains(&cutoff) {
                return Err(ResponderError::Config(format!(
                    "{} must be between 0 and 1, got {}",
                    name, cutoff
                )));
            }
        }
        if self.dictionary.timeout_secs == 0 {
            return Err(ResponderError::Config(
                "dictionary.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.dictionary.base_url.trim().is_empty() {
            return Err(ResponderError::Config(
                "dictionary.base_url cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg.tasks.path, PathBuf::from("tasks.json"));
        assert!(cfg.dictionary.enabled);
        assert_eq!(cfg.dictionary.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.dictionary.timeout(), Duration::from_secs(5));
        assert_eq!(cfg.matching.token_cutoff, 0.80);
        assert_eq!(cfg.matching.message_cutoff, 0.75);
        assert_eq!(cfg.server.port, 5000);
        assert!(cfg.intents_file.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let cfg = Config::from_toml(
            r#"
intents_file = "intents.toml"

[tasks]
path = "/tmp/my-tasks.json"

[dictionary]
enabled = false

[server]
host = "0.0.0.0"
port = 8080
"#,
        )
        .unwrap();
        assert_eq!(cfg.intents_file, Some(PathBuf::from("intents.toml")));
        assert_eq!(cfg.tasks.path, PathBuf::from("/tmp/my-tasks.json"));
        assert!(!cfg.dictionary.enabled);
        assert_eq!(cfg.dictionary.timeout_secs, 5);
        assert_eq!(cfg.server.host.to_string(), "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = Config::from_toml("[tasks]\nfile = \"x.json\"\n").unwrap_err();
        assert!(matches!(err, ResponderError::ConfigParse { .. }));
    }

    #[test]
    fn test_validation() {
        let mut cfg = Config::default();
        cfg.matching.token_cutoff = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.dictionary.timeout_secs = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responder.toml");
        std::fs::write(&path, "[matching]\ntoken_cutoff = 0.9\n").unwrap();

        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg.matching.token_cutoff, 0.9);
        assert_eq!(cfg.matching.message_cutoff, 0.75);

        assert!(Config::load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}

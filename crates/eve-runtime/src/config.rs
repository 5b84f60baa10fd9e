//! Runtime configuration
//!
//! Loaded from JSON. Durations are humantime strings ("6s", "1000ms").
//! Every field has a default, so `{}` is a valid config.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use eve_sequencer::SequencerConfig;

use crate::{RuntimeError, RuntimeResult};

/// Logging configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive, overridden by RUST_LOG
    pub filter: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "info".to_string(),
            json: false,
            with_target: true,
        }
    }
}

/// Runtime configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    #[serde(deserialize_with = "humantime_duration")]
    pub transition_delay: Duration,
    #[serde(deserialize_with = "humantime_duration")]
    pub read_delay: Duration,
    /// Hero persona rotation period while the visitor has not chosen
    #[serde(deserialize_with = "humantime_duration")]
    pub auto_rotate_interval: Duration,
    pub media_base_path: String,
    /// Playlist document location
    pub playlist_path: PathBuf,
    /// Preference key holding the last selected persona
    pub persona_key: String,
    pub logging: LoggingConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let sequencer = SequencerConfig::default();
        RuntimeConfig {
            transition_delay: sequencer.transition_delay,
            read_delay: sequencer.read_delay,
            auto_rotate_interval: Duration::from_millis(8000),
            media_base_path: sequencer.media_base_path,
            playlist_path: PathBuf::from("urls.json"),
            persona_key: "eve_persona".to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_json_str(json: &str) -> RuntimeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> RuntimeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RuntimeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Sequencer portion of the config
    pub fn sequencer(&self) -> SequencerConfig {
        SequencerConfig {
            transition_delay: self.transition_delay,
            read_delay: self.read_delay,
            media_base_path: self.media_base_path.clone(),
        }
    }
}

fn humantime_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    humantime::parse_duration(&text).map_err(serde::de::Error::custom)
}

//! Runtime configuration
//!
//! Defaults match the game controller firmware. A JSON file can override
//! any subset of fields; command-line flags override the file.

use crate::protocol::ProtocolMode;
use crate::synth::{DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE};
use crate::transport::{DEFAULT_BAUD_RATE, DEFAULT_KEYWORDS};
use crate::{Result, TossCueError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Listener configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Active event protocol
    pub mode: ProtocolMode,
    /// Serial link speed
    pub baud_rate: u32,
    /// Explicit port; skips discovery when set
    pub port: Option<String>,
    /// Description keywords for port auto-detection
    pub port_keywords: Vec<String>,
    /// Serial read timeout in milliseconds
    pub read_timeout_ms: u64,
    /// Wait after opening the port before listening, in milliseconds
    pub settle_delay_ms: u64,
    /// Directory holding the sound assets
    pub asset_dir: PathBuf,
    /// Synthesized tone sample rate
    pub sample_rate: u32,
    /// Synthesized tone channel count
    pub channels: u16,
    /// Sleep after an empty read, in milliseconds
    pub idle_backoff_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: ProtocolMode::Scoring,
            baud_rate: DEFAULT_BAUD_RATE,
            port: None,
            port_keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            read_timeout_ms: 1000,
            settle_delay_ms: 2000,
            asset_dir: PathBuf::from("."),
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: DEFAULT_CHANNELS,
            idle_backoff_ms: 10,
        }
    }
}

impl Config {
    /// Load a JSON configuration file; missing fields take defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            TossCueError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&text).map_err(|e| {
            TossCueError::Config(format!("Failed to parse '{}': {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the listener cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.baud_rate == 0 {
            return Err(TossCueError::Config("baud_rate must be positive".into()));
        }
        if self.sample_rate == 0 {
            return Err(TossCueError::Config("sample_rate must be positive".into()));
        }
        if !(1..=2).contains(&self.channels) {
            return Err(TossCueError::Config(format!(
                "channels must be 1 or 2, got {}",
                self.channels
            )));
        }
        Ok(())
    }

    /// Serial read timeout
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Post-open settle delay
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Idle backoff between empty reads
    pub fn idle_backoff(&self) -> Duration {
        Duration::from_millis(self.idle_backoff_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.sample_rate, 22_050);
        assert_eq!(config.channels, 2);
        assert_eq!(config.port_keywords.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"mode": "outcome", "asset_dir": "sounds"}}"#).unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.mode, ProtocolMode::Outcome);
        assert_eq!(config.asset_dir, PathBuf::from("sounds"));
        assert_eq!(config.baud_rate, 115_200);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"channels": 6}}"#).unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(TossCueError::Config(_))
        ));
    }

    #[test]
    fn test_unparseable_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "mode = scoring").unwrap();
        assert!(Config::load(file.path()).is_err());
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Tunable parameters of the monitor core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Period of the process-table random walk, in milliseconds.
    #[serde(default = "default_process_interval_ms")]
    pub process_interval_ms: u64,
    /// Period of the resource sampler, in milliseconds.
    #[serde(default = "default_resource_interval_ms")]
    pub resource_interval_ms: u64,
    /// Number of processes seeded at startup.
    #[serde(default = "default_process_count")]
    pub process_count: usize,
    /// Number of samples kept in the rolling history buffer.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

fn default_process_interval_ms() -> u64 { 2000 }
fn default_resource_interval_ms() -> u64 { 1000 }
fn default_process_count() -> usize { 25 }
fn default_history_capacity() -> usize { 60 }

const MIN_INTERVAL_MS: u64 = 100;
const MAX_INTERVAL_MS: u64 = 60_000;
const MAX_PROCESS_COUNT: usize = 500;
const MAX_HISTORY_CAPACITY: usize = 1000;

impl Default for Config {
    fn default() -> Self {
        Self {
            process_interval_ms: default_process_interval_ms(),
            resource_interval_ms: default_resource_interval_ms(),
            process_count: default_process_count(),
            history_capacity: default_history_capacity(),
        }
    }
}

/// Failures reading or writing the config file.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config file I/O failed: {e}"),
            ConfigError::Serialize(e) => write!(f, "config serialization failed: {e}"),
        }
    }
}

impl Config {
    /// Config directory: Windows → AppData/Local/simtop/
    /// Linux → ~/.config/simtop/
    fn config_dir() -> PathBuf {
        dirs::config_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("simtop")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Load from disk, falling back to defaults when the file is missing
    /// or unreadable. Out-of-range values are clamped, not rejected.
    pub fn load() -> Self {
        match fs::read_to_string(Self::config_path()) {
            Ok(contents) => {
                let mut cfg: Self = serde_json::from_str(&contents).unwrap_or_else(|e| {
                    log::warn!("invalid config file, using defaults: {e}");
                    Self::default()
                });
                cfg.sanitize();
                cfg
            }
            Err(_) => Self::default(),
        }
    }

    /// Clamp all fields to usable ranges.
    pub fn sanitize(&mut self) {
        self.process_interval_ms = self.process_interval_ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
        self.resource_interval_ms = self.resource_interval_ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
        self.process_count = self.process_count.clamp(1, MAX_PROCESS_COUNT);
        self.history_capacity = self.history_capacity.clamp(10, MAX_HISTORY_CAPACITY);
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(Self::config_dir()).map_err(ConfigError::Io)?;
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(Self::config_path(), json).map_err(ConfigError::Io)
    }

    pub fn process_interval(&self) -> Duration {
        Duration::from_millis(self.process_interval_ms)
    }

    pub fn resource_interval(&self) -> Duration {
        Duration::from_millis(self.resource_interval_ms)
    }
}

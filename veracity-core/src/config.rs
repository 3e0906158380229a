use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Key of the persisted history slot. Matches what earlier builds wrote.
pub const DEFAULT_HISTORY_KEY: &str = "fakeNewsHistory";

/// Default number of checks kept in history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct VeracityConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub scorer: ScorerConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the key-value file. `~` and `$VARS` are expanded.
    pub path: String,
    pub history_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "~/.local/share/veracity/store.json".to_string(),
            history_key: DEFAULT_HISTORY_KEY.to_string(),
        }
    }
}

impl StorageConfig {
    pub fn resolved_path(&self) -> PathBuf {
        match shellexpand::full(&self.path) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(e) => {
                tracing::warn!("Could not expand storage path {}: {}", self.path, e);
                PathBuf::from(shellexpand::tilde(&self.path).as_ref())
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScorerConfig {
    /// Artificial latency before a result is returned, in milliseconds.
    pub delay_ms: u64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self { delay_ms: 1500 }
    }
}

impl ScorerConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8767,
        }
    }
}

impl VeracityConfig {
    /// Load from an optional TOML file, then `VERACITY_*` environment overrides
    /// (`VERACITY_HTTP__PORT=9000`). A missing file yields the defaults.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("VERACITY").separator("__"))
            .build()?;
        s.try_deserialize()
    }
}

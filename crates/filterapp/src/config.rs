use crate::error::{FilterError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_APPLY_SETTLE_MS: u64 = 500;
const DEFAULT_FETCH_LATENCY_MS: u64 = 300;
const DEFAULT_VISIBLE_ROWS: usize = 12;

/// Configuration for the filter bar, stored as `config.json` in the config directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterBarConfig {
    /// How long the bar stays in the applying state after an apply
    #[serde(default = "default_apply_settle_ms")]
    pub apply_settle_ms: u64,

    /// Simulated latency of the built-in catalog
    #[serde(default = "default_fetch_latency_ms")]
    pub fetch_latency_ms: u64,

    /// Catalog file to load instead of the built-in catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    /// Rows the host can show before the add button goes sticky
    #[serde(default = "default_visible_rows")]
    pub visible_rows: usize,
}

fn default_apply_settle_ms() -> u64 {
    DEFAULT_APPLY_SETTLE_MS
}

fn default_fetch_latency_ms() -> u64 {
    DEFAULT_FETCH_LATENCY_MS
}

fn default_visible_rows() -> usize {
    DEFAULT_VISIBLE_ROWS
}

impl Default for FilterBarConfig {
    fn default() -> Self {
        Self {
            apply_settle_ms: DEFAULT_APPLY_SETTLE_MS,
            fetch_latency_ms: DEFAULT_FETCH_LATENCY_MS,
            catalog: None,
            visible_rows: DEFAULT_VISIBLE_ROWS,
        }
    }
}

impl FilterBarConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(FilterError::Io)?;
        let config: FilterBarConfig =
            serde_json::from_str(&content).map_err(FilterError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(FilterError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(FilterError::Serialization)?;
        fs::write(config_path, content).map_err(FilterError::Io)?;
        Ok(())
    }

    /// Write the defaults when the directory has no config yet. Returns whether it wrote one.
    pub fn init<P: AsRef<Path>>(config_dir: P) -> Result<bool> {
        let config_dir = config_dir.as_ref();
        if config_dir.join(CONFIG_FILENAME).exists() {
            return Ok(false);
        }
        Self::default().save(config_dir)?;
        Ok(true)
    }

    pub fn apply_settle(&self) -> Duration {
        Duration::from_millis(self.apply_settle_ms)
    }

    pub fn fetch_latency(&self) -> Duration {
        Duration::from_millis(self.fetch_latency_ms)
    }
}

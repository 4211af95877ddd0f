//! Scan configuration, loaded from TOML.
//!
//! ```toml
//! symbols = ["BTC-USD", "ETH-USD"]
//! timeframes = ["15m", "1h", "4h"]
//! workers = 4
//!
//! [data]
//! source = "csv"
//! dir = "data"
//!
//! [engine.risk]
//! account_balance = 25000.0
//! ```
//!
//! Everything under `[engine]` is optional and falls back to the engine
//! defaults.

use std::path::{Path, PathBuf};

use confluence_core::domain::Timeframe;
use confluence_core::engine::EngineConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid engine parameter: {0}")]
    Engine(#[from] confluence_core::error::ConfigError),

    #[error("invalid scan config: {0}")]
    Invalid(String),
}

/// Where candles come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DataSourceConfig {
    /// `<dir>/<SYMBOL>_<tf>.csv` files.
    Csv { dir: PathBuf },
    /// Deterministic random walks.
    Synthetic {
        #[serde(default)]
        seed: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub symbols: Vec<String>,

    /// Primary timeframes evaluated per symbol.
    #[serde(default = "default_timeframes")]
    pub timeframes: Vec<Timeframe>,

    /// Rayon worker threads. `0` uses rayon's global pool.
    #[serde(default)]
    pub workers: usize,

    pub data: DataSourceConfig,

    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_timeframes() -> Vec<Timeframe> {
    vec![Timeframe::M15, Timeframe::H1, Timeframe::H4]
}

impl ScanConfig {
    /// Parse and validate.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ScanConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::Invalid("at least one symbol is required".into()));
        }
        if let Some(blank) = self.symbols.iter().find(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("blank symbol {blank:?}")));
        }
        if self.timeframes.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one primary timeframe is required".into(),
            ));
        }
        self.engine.validate()?;
        Ok(())
    }
}

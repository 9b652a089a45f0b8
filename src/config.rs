//! Configuration loader — merges env vars, .env file, and config.toml.

use common::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;

use arb_core::EngineConfig;

// ── Bot config types ──────────────────────────────────────────────────

/// Top-level arb-signal-bot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Directory the scrapers drop `{source}-*.jsonl` snapshots into.
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: String,

    /// Directory for CSV exports and the results journal.
    #[serde(default = "default_results_dir")]
    pub results_dir: String,

    /// Sports to run, by profile name.
    #[serde(default = "default_sports")]
    pub sports: Vec<String>,

    /// Minimum profit ratio (min odds / max odds) worth alerting on.
    #[serde(default = "default_min_profit_threshold")]
    pub min_profit_threshold: f64,

    /// Matching-engine thresholds and stake sizing.
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_snapshot_dir() -> String {
    "data/snapshots".to_string()
}

fn default_results_dir() -> String {
    "data/results".to_string()
}

fn default_sports() -> Vec<String> {
    vec!["football".to_string(), "tennis".to_string()]
}

fn default_min_profit_threshold() -> f64 {
    0.95
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: default_snapshot_dir(),
            results_dir: default_results_dir(),
            sports: default_sports(),
            min_profit_threshold: default_min_profit_threshold(),
            engine: EngineConfig::default(),
        }
    }
}

// ── Config loader ─────────────────────────────────────────────────────

/// Load bot configuration from environment and optional config file.
pub fn load_config() -> Result<BotConfig, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = BotConfig::default();

    // 3. Try loading config.toml if it exists.
    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    // 4. Override with environment variables (highest priority).
    if let Ok(dir) = std::env::var("SNAPSHOT_DIR") {
        config.snapshot_dir = dir;
    }
    if let Ok(dir) = std::env::var("RESULTS_DIR") {
        config.results_dir = dir;
    }
    if let Ok(raw) = std::env::var("MIN_PROFIT_THRESHOLD") {
        config.min_profit_threshold = raw
            .parse()
            .map_err(|_| Error::Config(format!("MIN_PROFIT_THRESHOLD is not a number: {}", raw)))?;
    }

    // 5. Validate.
    if config.sports.is_empty() {
        return Err(Error::Config("at least one sport must be configured".into()));
    }
    if !(0.0..=1.0).contains(&config.min_profit_threshold) {
        return Err(Error::Config(format!(
            "min_profit_threshold must be in [0, 1], got {}",
            config.min_profit_threshold
        )));
    }
    if config.engine.bankroll <= 0.0 {
        return Err(Error::Config(format!(
            "bankroll must be positive, got {}",
            config.engine.bankroll
        )));
    }

    Ok(config)
}

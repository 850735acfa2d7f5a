//! Configuration loading from environment variables.
//!
//! All values come from `COLLECTOR_*` environment variables with defaults.
//! Invalid values fall back to defaults without crashing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `COLLECTOR_LOG_FORMAT` | json | Log format (`json` or `pretty`) |
//! | `COLLECTOR_LOG_LEVEL` | warn | `EnvFilter` directive |
//! | `COLLECTOR_LOG_FILE` | (stderr) | Log file path |
//! | `COLLECTOR_TABLES_DIR` | (none) | Directory of extra `*.toml` version tables |
//! | `COLLECTOR_FALLBACK` | table | `table` keeps each table's policy, `strict` forces strict |

use std::path::PathBuf;

use crate::telemetry::{LogConfig, LogFormat};
use crate::versions::FallbackPolicy;

/// Process-wide override of per-table fallback policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackOverride {
    /// Use the policy declared by each table.
    #[default]
    Table,
    /// Force strict resolution everywhere.
    Strict,
}

impl FallbackOverride {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "table" | "" => Some(Self::Table),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }

    pub fn apply(self, declared: FallbackPolicy) -> FallbackPolicy {
        match self {
            Self::Table => declared,
            Self::Strict => FallbackPolicy::Strict,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Strict => "strict",
        }
    }
}

/// Effective configuration summary for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub log_format: String,
    pub log_level: String,
    pub log_file: Option<String>,
    pub tables_dir: Option<String>,
    pub fallback: String,
}

/// All configuration loaded from environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub log: LogConfig,
    pub tables_dir: Option<PathBuf>,
    pub fallback: FallbackOverride,
    /// Values that were present but invalid, replaced by defaults.
    pub rejected: Vec<String>,
}

/// Non-empty env var value.
fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn load_log_config(rejected: &mut Vec<String>) -> LogConfig {
    let defaults = LogConfig::default();
    let format = match env_value("COLLECTOR_LOG_FORMAT") {
        Some(raw) => raw.parse::<LogFormat>().unwrap_or_else(|_| {
            rejected.push(format!("COLLECTOR_LOG_FORMAT ({raw}) is not one of: json, pretty"));
            defaults.format
        }),
        None => defaults.format,
    };
    let level = env_value("COLLECTOR_LOG_LEVEL").unwrap_or(defaults.level);
    let output_path = env_value("COLLECTOR_LOG_FILE").map(PathBuf::from);
    LogConfig { format, level, output_path }
}

/// Load all configuration from environment variables.
pub fn load() -> EnvConfig {
    let mut rejected = Vec::new();
    let fallback = match env_value("COLLECTOR_FALLBACK") {
        Some(raw) => FallbackOverride::parse(&raw).unwrap_or_else(|| {
            rejected.push(format!("COLLECTOR_FALLBACK ({raw}) is not one of: table, strict"));
            FallbackOverride::default()
        }),
        None => FallbackOverride::default(),
    };

    EnvConfig {
        log: load_log_config(&mut rejected),
        tables_dir: env_value("COLLECTOR_TABLES_DIR").map(PathBuf::from),
        fallback,
        rejected,
    }
}

impl EnvConfig {
    pub fn effective_config(&self) -> EffectiveConfig {
        EffectiveConfig {
            log_format: self.log.format.to_string(),
            log_level: self.log.level.clone(),
            log_file: self.log.output_path.as_ref().map(|p| p.display().to_string()),
            tables_dir: self.tables_dir.as_ref().map(|p| p.display().to_string()),
            fallback: self.fallback.as_str().to_string(),
        }
    }

    /// Human-readable problems with this configuration; empty when valid.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = self.rejected.clone();
        if let Some(dir) = &self.tables_dir {
            if !dir.is_dir() {
                warnings.push(format!(
                    "COLLECTOR_TABLES_DIR ({}) is not a directory",
                    dir.display()
                ));
            }
        }
        warnings
    }
}

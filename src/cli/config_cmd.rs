// Copyright 2025-2026 collector-dispatch Contributors
// SPDX-License-Identifier: Apache-2.0

//! Config CLI subcommands: show, validate.

use crate::cli::{EXIT_CONFIG, EXIT_OK};
use crate::collectors::StaticLoader;
use crate::config::{EffectiveConfig, EnvConfig};

/// Print effective config as key-value pairs to stdout.
pub fn run_show(config: &EnvConfig) -> i32 {
    print_config(&config.effective_config());
    EXIT_OK
}

/// Validate environment values and every version table they select.
///
/// Returns 0 if valid, 2 on any problem.
pub fn run_validate(config: &EnvConfig) -> i32 {
    let mut problems = config.validate();

    if problems.is_empty() {
        let loaders = |_: &str| -> std::sync::Arc<dyn crate::ImplementationLoader> {
            std::sync::Arc::new(StaticLoader::new())
        };
        match crate::build_registry(config, loaders) {
            Ok(registry) => println!(
                "Version tables valid: {} namespace(s) [{}]",
                registry.len(),
                registry.list_namespaces().join(", ")
            ),
            Err(e) => problems.push(e.to_string()),
        }
    }

    for problem in &problems {
        eprintln!("WARNING: {}", problem);
    }
    if problems.is_empty() {
        println!("Configuration is valid.");
        EXIT_OK
    } else {
        EXIT_CONFIG
    }
}

fn print_config(cfg: &EffectiveConfig) {
    println!("COLLECTOR_LOG_FORMAT={}", cfg.log_format);
    println!("COLLECTOR_LOG_LEVEL={}", cfg.log_level);
    println!("COLLECTOR_LOG_FILE={}", cfg.log_file.as_deref().unwrap_or(""));
    println!("COLLECTOR_TABLES_DIR={}", cfg.tables_dir.as_deref().unwrap_or(""));
    println!("COLLECTOR_FALLBACK={}", cfg.fallback);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackOverride;
    use std::path::PathBuf;

    #[test]
    fn test_show_defaults() {
        assert_eq!(run_show(&EnvConfig::default()), EXIT_OK);
    }

    #[test]
    fn test_validate_builtin_only() {
        let config = EnvConfig {
            fallback: FallbackOverride::Strict,
            ..EnvConfig::default()
        };
        assert_eq!(run_validate(&config), EXIT_OK);
    }

    #[test]
    fn test_validate_bad_tables_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.toml"), "namespace = ").unwrap();
        let config = EnvConfig {
            tables_dir: Some(PathBuf::from(dir.path())),
            ..EnvConfig::default()
        };
        assert_eq!(run_validate(&config), EXIT_CONFIG);
    }
}

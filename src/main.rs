//! collector-cli entry point.
//!
//! Inspects the built-in and configured version tables:
//!
//! - `collector-cli namespaces` - List registered frameworks
//! - `collector-cli ops <ns>` - List operations and generations
//! - `collector-cli versions <ns> <op>` - List supported versions
//! - `collector-cli resolve <ns> <op> <version>` - Resolve a version
//! - `collector-cli config show|validate` - Inspect configuration

use std::process::ExitCode;
use std::sync::Arc;

use collector_dispatch::cli::{config_cmd, versions_cmd, EXIT_CONFIG, EXIT_FAILURE};
use collector_dispatch::config as collector_config;
use collector_dispatch::telemetry::init_logging;
use collector_dispatch::{build_registry, ImplementationLoader, NamespaceRegistry, StaticLoader};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    let config = collector_config::load();
    if let Err(e) = init_logging(&config.log) {
        eprintln!("Logging setup failed: {}", e);
        return exit(EXIT_CONFIG);
    }

    match command {
        "namespaces" | "ns" => with_registry(&config, versions_cmd::run_namespaces),
        "ops" | "operations" => match args.get(2) {
            Some(ns) => with_registry(&config, |r| versions_cmd::run_operations(r, ns)),
            None => usage_error("ops <namespace>"),
        },
        "versions" => match (args.get(2), args.get(3)) {
            (Some(ns), Some(op)) => with_registry(&config, |r| versions_cmd::run_versions(r, ns, op)),
            _ => usage_error("versions <namespace> <operation>"),
        },
        "resolve" => match (args.get(2), args.get(3), args.get(4)) {
            (Some(ns), Some(op), Some(version)) => {
                with_registry(&config, |r| versions_cmd::run_resolve(r, ns, op, version))
            }
            _ => usage_error("resolve <namespace> <operation> <version>"),
        },
        "config" => {
            let subcommand = args.get(2).map(|s| s.as_str()).unwrap_or("show");
            match subcommand {
                "show" => exit(config_cmd::run_show(&config)),
                "validate" => exit(config_cmd::run_validate(&config)),
                _ => {
                    eprintln!("Unknown config subcommand: {}", subcommand);
                    usage_error("config show|validate")
                }
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("collector-cli {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            ExitCode::FAILURE
        }
    }
}

/// Build the registry with empty loaders and run `f` against it.
fn with_registry<F>(config: &collector_config::EnvConfig, f: F) -> ExitCode
where
    F: FnOnce(&NamespaceRegistry) -> i32,
{
    let loaders = |_: &str| -> Arc<dyn ImplementationLoader> { Arc::new(StaticLoader::new()) };
    match build_registry(config, loaders) {
        Ok(registry) => exit(f(&registry)),
        Err(e) => {
            eprintln!("Failed to load version tables: {}", e);
            exit(EXIT_CONFIG)
        }
    }
}

fn usage_error(usage: &str) -> ExitCode {
    eprintln!("Usage: collector-cli {}", usage);
    exit(EXIT_FAILURE)
}

fn exit(code: i32) -> ExitCode {
    ExitCode::from(code as u8)
}

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "collector-cli - collector version resolution v{}

USAGE:
    collector-cli [COMMAND] [ARGS]

COMMANDS:
    namespaces                          List registered frameworks
    ops <namespace>                     List operations and their generations
    versions <namespace> <operation>    List supported framework versions
    resolve <ns> <op> <version>         Show the generation a version resolves to
    config show                         Show effective configuration
    config validate                     Validate configuration and version tables
    version                             Show version information
    help                                Show this help message

EXAMPLES:
    collector-cli resolve vllm attn 0.15.1
    collector-cli versions trtllm moe
    COLLECTOR_FALLBACK=strict collector-cli resolve vllm attn 0.16.0

ENVIRONMENT:
    COLLECTOR_LOG_FORMAT   json | pretty (default: json)
    COLLECTOR_LOG_LEVEL    Log filter (default: warn)
    COLLECTOR_LOG_FILE     Log file (default: stderr)
    COLLECTOR_TABLES_DIR   Directory of extra version table manifests
    COLLECTOR_FALLBACK     table | strict (default: table)

EXIT CODES:
    0  Success
    1  Lookup or resolution failure
    2  Configuration error",
        version
    );
}

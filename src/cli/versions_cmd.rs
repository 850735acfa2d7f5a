// Copyright 2025-2026 collector-dispatch Contributors
// SPDX-License-Identifier: Apache-2.0

//! Version table CLI subcommands: namespaces, ops, versions, resolve.

use crate::cli::{EXIT_FAILURE, EXIT_OK};
use crate::collectors::UnitId;
use crate::dispatch::NamespaceRegistry;

/// Run `namespaces`: one row per registered framework.
pub fn run_namespaces(registry: &NamespaceRegistry) -> i32 {
    println!("{:<12} {:<16} {:>10}", "NAMESPACE", "FALLBACK", "OPERATIONS");
    println!("{}", "-".repeat(40));
    for id in registry.list_namespaces() {
        if let Ok(ns) = registry.namespace(&id) {
            println!(
                "{:<12} {:<16} {:>10}",
                ns.id(),
                ns.policy().to_string(),
                ns.table().len()
            );
        }
    }
    EXIT_OK
}

/// Run `ops <namespace>`: operations with their generations.
pub fn run_operations(registry: &NamespaceRegistry, namespace: &str) -> i32 {
    let ns = match registry.namespace(namespace) {
        Ok(ns) => ns,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_FAILURE;
        }
    };

    println!("{:<24} {:<16} {:<10}", "OPERATION", "GENERATIONS", "FALLBACK");
    println!("{}", "-".repeat(52));
    for op in ns.table().operations() {
        let tags: Vec<String> = op.tags().iter().map(ToString::to_string).collect();
        let fallback = ns
            .resolver()
            .fallback_tag(op.name())
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string());
        println!("{:<24} {:<16} {:<10}", op.name(), tags.join(","), fallback);
    }
    EXIT_OK
}

/// Run `versions <namespace> <operation>`.
pub fn run_versions(registry: &NamespaceRegistry, namespace: &str, operation: &str) -> i32 {
    match registry.list_supported_versions(namespace, operation) {
        Ok(versions) => {
            for v in versions {
                println!("{}", v);
            }
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

/// Run `resolve <namespace> <operation> <version>`.
pub fn run_resolve(registry: &NamespaceRegistry, namespace: &str, operation: &str, version: &str) -> i32 {
    let resolved = registry
        .namespace(namespace)
        .and_then(|ns| Ok(ns.resolve_detailed(operation, version)?));

    match resolved {
        Ok(resolution) => {
            let unit = UnitId::new(namespace, operation, resolution.tag.clone());
            let how = if resolution.exact { "exact" } else { "fallback" };
            println!("{}\t{}\t{}", resolution.tag, how, unit);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

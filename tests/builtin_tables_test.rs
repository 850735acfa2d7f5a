//! Tests for the built-in vllm, sglang and trtllm version tables.

use std::sync::Arc;

use collector_dispatch::builtin::{builtin_registry, BUILTIN_NAMESPACES};
use collector_dispatch::config::FallbackOverride;
use collector_dispatch::versions::ResolveError;
use collector_dispatch::{DispatchError, ImplementationLoader, NamespaceRegistry, StaticLoader};

fn registry(fallback: FallbackOverride) -> NamespaceRegistry {
    builtin_registry(fallback, |_| -> Arc<dyn ImplementationLoader> { Arc::new(StaticLoader::new()) })
        .unwrap()
}

#[test]
fn test_builtin_namespaces_registered() {
    let registry = registry(FallbackOverride::Table);
    let mut expected: Vec<String> = BUILTIN_NAMESPACES.iter().map(|s| s.to_string()).collect();
    expected.sort();
    assert_eq!(registry.list_namespaces(), expected);
}

#[test]
fn test_trtllm_exact_generations() {
    let registry = registry(FallbackOverride::Table);
    assert_eq!(registry.resolve("trtllm", "mla", "1.1.0rc1").unwrap(), "v1");
    assert_eq!(registry.resolve("trtllm", "mla", "1.1.0rc2").unwrap(), "v2");
    assert_eq!(registry.resolve("trtllm", "moe", "0.10.0").unwrap(), "v1");
    assert_eq!(registry.resolve("trtllm", "moe", "0.12.0").unwrap(), "v2");
    assert_eq!(registry.resolve("trtllm", "moe", "1.3.0").unwrap(), "v3");
}

#[test]
fn test_trtllm_fallback_takes_last_generation() {
    let registry = registry(FallbackOverride::Table);
    assert_eq!(registry.resolve("trtllm", "moe", "2.0.0").unwrap(), "v3");
    assert_eq!(registry.resolve("trtllm", "mla", "2.0.0").unwrap(), "v2");
}

#[test]
fn test_vllm_resolution() {
    let registry = registry(FallbackOverride::Table);
    assert_eq!(registry.resolve("vllm", "attn", "0.15.1").unwrap(), "v2");
    assert_eq!(registry.resolve("vllm", "attn", "0.14.0").unwrap(), "v1");
    assert_eq!(registry.resolve("vllm", "attn", "0.16.0").unwrap(), "v2");
    assert_eq!(registry.resolve("vllm", "moe", "0.16.0").unwrap(), "v1");
}

#[test]
fn test_sglang_fallback_takes_first_generation() {
    let registry = registry(FallbackOverride::Table);
    assert_eq!(registry.resolve("sglang", "attn", "0.6.0").unwrap(), "v1");
    assert_eq!(registry.resolve("sglang", "wideep_mlp", "0.5.8").unwrap(), "v1");
}

#[test]
fn test_supported_versions_sorted_and_unique() {
    let registry = registry(FallbackOverride::Table);
    assert_eq!(
        registry.list_supported_versions("trtllm", "mla").unwrap(),
        vec!["0.9.0", "1.0.0", "1.1.0", "1.1.0rc1", "1.1.0rc2", "1.2.0", "1.3.0"]
    );
    assert_eq!(
        registry.list_supported_versions("vllm", "moe").unwrap(),
        vec!["0.11.0", "0.12.0", "0.14.0", "0.15.0", "0.15.1"]
    );
}

#[test]
fn test_operations_listed_per_namespace() {
    let registry = registry(FallbackOverride::Table);
    let ops = registry.list_operations("vllm").unwrap();
    assert_eq!(ops, vec!["attn", "gemm", "mla", "moe"]);
    assert!(registry.list_operations("trtllm").unwrap().contains(&"computescale".to_string()));
}

#[test]
fn test_strict_override_rejects_unlisted_versions() {
    let registry = registry(FallbackOverride::Strict);
    assert_eq!(registry.resolve("vllm", "attn", "0.15.1").unwrap(), "v2");

    let err = registry.resolve("vllm", "attn", "0.16.0").unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Resolve(ResolveError::UnsupportedVersion { ref version, .. }) if version == "0.16.0"
    ));
}

#[test]
fn test_unknown_builtin_lookups() {
    let registry = registry(FallbackOverride::Table);
    assert!(matches!(
        registry.resolve("tgi", "attn", "1.0.0"),
        Err(DispatchError::UnknownNamespace { .. })
    ));
    assert!(matches!(
        registry.list_supported_versions("sglang", "mamba2"),
        Err(DispatchError::Resolve(ResolveError::UnknownOperation { .. }))
    ));
}

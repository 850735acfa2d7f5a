//! Built-in version tables for the supported serving frameworks.
//!
//! Tables are embedded at compile time. Collector units are supplied by the
//! caller through one loader per namespace.

use std::sync::Arc;

use crate::collectors::ImplementationLoader;
use crate::config::FallbackOverride;
use crate::dispatch::{NamespaceRegistry, RegistryError};
use crate::versions::{ManifestError, TableManifest};

const VLLM_TABLE: &str = include_str!("tables/vllm.toml");
const SGLANG_TABLE: &str = include_str!("tables/sglang.toml");
const TRTLLM_TABLE: &str = include_str!("tables/trtllm.toml");

/// Namespaces shipped with the crate.
pub const BUILTIN_NAMESPACES: &[&str] = &["vllm", "sglang", "trtllm"];

fn builtin_sources() -> [(&'static str, &'static str); 3] {
    [
        ("vllm", VLLM_TABLE),
        ("sglang", SGLANG_TABLE),
        ("trtllm", TRTLLM_TABLE),
    ]
}

/// Parse the embedded manifests.
pub fn builtin_manifests() -> Result<Vec<TableManifest>, ManifestError> {
    builtin_sources()
        .iter()
        .map(|(_, source)| TableManifest::from_toml(source))
        .collect()
}

/// Manifest for a single built-in namespace.
pub fn builtin_manifest(namespace: &str) -> Option<Result<TableManifest, ManifestError>> {
    builtin_sources()
        .iter()
        .find(|(name, _)| *name == namespace)
        .map(|(_, source)| TableManifest::from_toml(source))
}

/// Register every built-in namespace with the loader `loader_for` returns.
pub fn register_builtins<F>(
    registry: &mut NamespaceRegistry,
    fallback: FallbackOverride,
    mut loader_for: F,
) -> Result<(), RegistryError>
where
    F: FnMut(&str) -> Arc<dyn ImplementationLoader>,
{
    for manifest in builtin_manifests()? {
        let policy = fallback.apply(manifest.policy());
        let loader = loader_for(&manifest.namespace);
        registry.register_manifest_with_policy(&manifest, policy, loader)?;
    }
    Ok(())
}

/// Registry holding only the built-in namespaces.
pub fn builtin_registry<F>(fallback: FallbackOverride, loader_for: F) -> Result<NamespaceRegistry, RegistryError>
where
    F: FnMut(&str) -> Arc<dyn ImplementationLoader>,
{
    let mut registry = NamespaceRegistry::new();
    register_builtins(&mut registry, fallback, loader_for)?;
    Ok(registry)
}

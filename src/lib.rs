//! Collector dispatch core.
//!
//! Resolves a `(framework, operation, framework version)` triple to the
//! implementation generation of a performance collector (`v1`, `v2`, ...),
//! loads that generation's implementation unit and invokes a named function
//! on it.
//!
//! # Flow
//!
//! caller -> [`NamespaceRegistry`] (framework) -> [`VersionResolver`]
//! (version -> generation) -> [`ImplementationLoader`] (generation -> unit)
//! -> [`Dispatcher`] (invoke) -> value or [`DispatchError`].
//!
//! Version matching is exact string equality. Versions that match nothing
//! either fall back to the operation's latest generation or fail, depending
//! on the namespace's [`FallbackPolicy`].

pub mod builtin;
pub mod cli;
pub mod collectors;
pub mod config;
pub mod dispatch;
pub mod telemetry;
pub mod versions;

use std::sync::Arc;

use tracing::info;

pub use collectors::{CallArgs, CollectorUnit, ImplementationLoader, StaticLoader, UnitId};
pub use dispatch::{DispatchError, Dispatcher, NamespaceRegistry, RegistryError};
pub use versions::{FallbackPolicy, GenerationTag, LatestTag, VersionResolver, VersionTable};

use config::EnvConfig;
use versions::TableManifest;

/// Build the process registry: built-in tables plus any manifests found in
/// `COLLECTOR_TABLES_DIR`, all subject to the configured fallback override.
///
/// `loader_for` is called once per namespace.
pub fn build_registry<F>(config: &EnvConfig, mut loader_for: F) -> Result<NamespaceRegistry, RegistryError>
where
    F: FnMut(&str) -> Arc<dyn ImplementationLoader>,
{
    let mut registry = NamespaceRegistry::new();
    builtin::register_builtins(&mut registry, config.fallback, &mut loader_for)?;

    if let Some(dir) = &config.tables_dir {
        for manifest in TableManifest::load_dir(dir)? {
            let policy = config.fallback.apply(manifest.policy());
            let loader = loader_for(&manifest.namespace);
            registry.register_manifest_with_policy(&manifest, policy, loader)?;
        }
        info!(dir = %dir.display(), namespaces = registry.len(), "loaded custom version tables");
    }

    Ok(registry)
}

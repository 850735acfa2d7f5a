//! Namespace registry: framework id -> (version resolver, loader).
//!
//! Built once at startup through `&mut self` registration, then shared
//! read-only (typically as `Arc<NamespaceRegistry>`).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::dispatcher::Dispatcher;
use super::error::DispatchError;
use crate::collectors::{CallArgs, CollectorUnit, ImplementationLoader};
use crate::telemetry;
use crate::versions::{
    FallbackPolicy, GenerationTag, ManifestError, Resolution, ResolveError, TableManifest,
    VersionResolver, VersionTable,
};

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Namespace already registered: {0}")]
    NamespaceExists(String),

    #[error("Namespace identifier cannot be empty")]
    EmptyNamespace,

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// One independently versioned framework.
pub struct Namespace {
    id: String,
    resolver: VersionResolver,
    loader: Arc<dyn ImplementationLoader>,
}

impl Namespace {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn resolver(&self) -> &VersionResolver {
        &self.resolver
    }

    pub fn table(&self) -> &VersionTable {
        self.resolver.table()
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.resolver.policy()
    }

    pub fn loader(&self) -> &Arc<dyn ImplementationLoader> {
        &self.loader
    }

    pub fn resolve(&self, operation: &str, version: &str) -> Result<GenerationTag, ResolveError> {
        self.resolve_detailed(operation, version).map(|r| r.tag)
    }

    /// Resolve and report lenient fallbacks.
    pub fn resolve_detailed(&self, operation: &str, version: &str) -> Result<Resolution, ResolveError> {
        let resolution = self.resolver.resolve_detailed(operation, version)?;
        if resolution.exact {
            debug!(namespace = %self.id, operation, version, tag = %resolution.tag, "resolved version");
        } else {
            warn!(
                namespace = %self.id,
                operation,
                version,
                tag = %resolution.tag,
                "version not listed, falling back to latest generation"
            );
            telemetry::record_version_fallback(&self.id, operation);
        }
        Ok(resolution)
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("id", &self.id)
            .field("policy", &self.policy())
            .field("operations", &self.table().all_operations())
            .finish_non_exhaustive()
    }
}

/// Process-wide set of namespaces.
#[derive(Debug, Default)]
pub struct NamespaceRegistry {
    namespaces: BTreeMap<String, Namespace>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a namespace (fails if the id is already taken).
    pub fn register(
        &mut self,
        id: impl Into<String>,
        table: VersionTable,
        policy: FallbackPolicy,
        loader: Arc<dyn ImplementationLoader>,
    ) -> Result<(), RegistryError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(RegistryError::EmptyNamespace);
        }
        if self.namespaces.contains_key(&id) {
            return Err(RegistryError::NamespaceExists(id));
        }

        info!(namespace = %id, operations = table.len(), %policy, "registered namespace");
        let resolver = VersionResolver::new(table, policy);
        self.namespaces.insert(id.clone(), Namespace { id, resolver, loader });
        Ok(())
    }

    /// Register the namespace described by `manifest` with its own policy.
    pub fn register_manifest(
        &mut self,
        manifest: &TableManifest,
        loader: Arc<dyn ImplementationLoader>,
    ) -> Result<(), RegistryError> {
        self.register_manifest_with_policy(manifest, manifest.policy(), loader)
    }

    /// Register `manifest` with an overriding fallback policy.
    pub fn register_manifest_with_policy(
        &mut self,
        manifest: &TableManifest,
        policy: FallbackPolicy,
        loader: Arc<dyn ImplementationLoader>,
    ) -> Result<(), RegistryError> {
        let table = manifest.build_table()?;
        self.register(manifest.namespace.clone(), table, policy, loader)
    }

    pub fn namespace(&self, id: &str) -> Result<&Namespace, DispatchError> {
        self.namespaces.get(id).ok_or_else(|| DispatchError::UnknownNamespace {
            namespace: id.to_string(),
            known: self.list_namespaces(),
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.namespaces.contains_key(id)
    }

    /// Registered namespace ids, sorted.
    pub fn list_namespaces(&self) -> Vec<String> {
        self.namespaces.keys().cloned().collect()
    }

    pub fn list_operations(&self, namespace: &str) -> Result<Vec<String>, DispatchError> {
        Ok(self.namespace(namespace)?.table().all_operations())
    }

    /// Sorted, deduplicated versions supported for `operation`.
    pub fn list_supported_versions(&self, namespace: &str, operation: &str) -> Result<Vec<String>, DispatchError> {
        Ok(self.namespace(namespace)?.table().versions_for(operation)?)
    }

    pub fn resolve(&self, namespace: &str, operation: &str, version: &str) -> Result<GenerationTag, DispatchError> {
        Ok(self.namespace(namespace)?.resolve(operation, version)?)
    }

    pub fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(self)
    }

    /// Load the collector unit serving `(namespace, operation, version)`.
    pub async fn collector(
        &self,
        namespace: &str,
        operation: &str,
        version: &str,
    ) -> Result<Arc<CollectorUnit>, DispatchError> {
        self.dispatcher().collector(namespace, operation, version).await
    }

    pub async fn dispatch(
        &self,
        namespace: &str,
        operation: &str,
        version: &str,
        function: &str,
        args: &CallArgs,
    ) -> Result<Value, DispatchError> {
        self.dispatcher()
            .dispatch(namespace, operation, version, function, args)
            .await
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::StaticLoader;
    use crate::versions::LatestTag;

    fn table() -> VersionTable {
        VersionTable::builder()
            .operation("attn", [("v1", vec!["0.11.0"]), ("v2", vec!["0.15.1"])])
            .unwrap()
            .build()
    }

    fn registry() -> NamespaceRegistry {
        let mut registry = NamespaceRegistry::new();
        registry
            .register("vllm", table(), FallbackPolicy::Strict, Arc::new(StaticLoader::new()))
            .unwrap();
        registry
            .register(
                "sglang",
                table(),
                FallbackPolicy::Lenient(LatestTag::First),
                Arc::new(StaticLoader::new()),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_duplicate_namespace_rejected() {
        let mut registry = registry();
        let err = registry
            .register("vllm", table(), FallbackPolicy::Strict, Arc::new(StaticLoader::new()))
            .unwrap_err();
        assert!(matches!(err, RegistryError::NamespaceExists(ref id) if id == "vllm"));
    }

    #[test]
    fn test_empty_namespace_rejected() {
        let mut registry = NamespaceRegistry::new();
        let err = registry
            .register("", table(), FallbackPolicy::Strict, Arc::new(StaticLoader::new()))
            .unwrap_err();
        assert!(matches!(err, RegistryError::EmptyNamespace));
    }

    #[test]
    fn test_list_namespaces_sorted() {
        assert_eq!(registry().list_namespaces(), vec!["sglang", "vllm"]);
    }

    #[test]
    fn test_policies_are_per_namespace() {
        let registry = registry();
        assert!(registry.resolve("vllm", "attn", "0.12.0").is_err());
        assert_eq!(registry.resolve("sglang", "attn", "0.12.0").unwrap(), "v1");
    }

    #[test]
    fn test_introspection_unknown_namespace() {
        let err = registry().list_operations("trtllm").unwrap_err();
        match err {
            DispatchError::UnknownNamespace { namespace, known } => {
                assert_eq!(namespace, "trtllm");
                assert_eq!(known, vec!["sglang", "vllm"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_list_supported_versions_unknown_operation() {
        let err = registry().list_supported_versions("vllm", "moe").unwrap_err();
        assert_eq!(err.kind(), "unknown_operation");
    }
}

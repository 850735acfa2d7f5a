//! Resolve -> load -> invoke.
//!
//! The dispatcher holds no state of its own. Every call re-resolves the
//! version and asks the namespace's loader for the unit; results and
//! collector errors are returned verbatim.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, Instrument};

use super::error::DispatchError;
use super::registry::NamespaceRegistry;
use crate::collectors::{CallArgs, CollectorUnit, UnitId};
use crate::telemetry::{self, DispatchSpan, SpanExt, UNKNOWN_LABEL};

/// Borrowing front-end over a [`NamespaceRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'r> {
    registry: &'r NamespaceRegistry,
}

impl<'r> Dispatcher<'r> {
    pub fn new(registry: &'r NamespaceRegistry) -> Self {
        Self { registry }
    }

    /// Resolve the generation and load its implementation unit.
    pub async fn collector(
        &self,
        namespace: &str,
        operation: &str,
        version: &str,
    ) -> Result<Arc<CollectorUnit>, DispatchError> {
        let ns = self.registry.namespace(namespace)?;
        let resolution = ns.resolve_detailed(operation, version)?;
        let unit = UnitId::new(ns.id(), operation, resolution.tag);
        Ok(ns.loader().load(&unit).await?)
    }

    /// Invoke `function` on the collector serving `(namespace, operation, version)`.
    pub async fn dispatch(
        &self,
        namespace: &str,
        operation: &str,
        version: &str,
        function: &str,
        args: &CallArgs,
    ) -> Result<Value, DispatchError> {
        let span = DispatchSpan::new(namespace, operation, version, function);
        let result = self
            .invoke(namespace, operation, version, function, args)
            .instrument(span.clone())
            .await;

        span.record_result(&result);
        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        let (ns_label, op_label) = self.metric_labels(namespace, operation);
        telemetry::record_dispatch(ns_label, op_label, outcome);
        result
    }

    /// Caller-supplied names only become labels once they are registered.
    fn metric_labels<'a>(&self, namespace: &'a str, operation: &'a str) -> (&'a str, &'a str) {
        match self.registry.namespace(namespace) {
            Err(_) => (UNKNOWN_LABEL, UNKNOWN_LABEL),
            Ok(ns) if !ns.table().contains_operation(operation) => (namespace, UNKNOWN_LABEL),
            Ok(_) => (namespace, operation),
        }
    }

    async fn invoke(
        &self,
        namespace: &str,
        operation: &str,
        version: &str,
        function: &str,
        args: &CallArgs,
    ) -> Result<Value, DispatchError> {
        let collector = self.collector(namespace, operation, version).await?;
        tracing::Span::current().record("unit", collector.id().to_string().as_str());

        let Some(func) = collector.get_function(function) else {
            return Err(DispatchError::FunctionNotFound {
                unit: collector.id().clone(),
                version: version.to_string(),
                function: function.to_string(),
                available: collector.function_names(),
            });
        };

        debug!(unit = %collector.id(), function, "invoking collector function");
        func(args).map_err(DispatchError::Invocation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::StaticLoader;
    use crate::versions::{FallbackPolicy, VersionTable};

    fn registry() -> NamespaceRegistry {
        let table = VersionTable::builder()
            .operation("attn", [("v1", vec!["0.11.0"])])
            .unwrap()
            .build();
        let mut registry = NamespaceRegistry::new();
        registry
            .register("vllm", table, FallbackPolicy::Strict, Arc::new(StaticLoader::new()))
            .unwrap();
        registry
    }

    #[test]
    fn test_metric_labels_hide_unregistered_names() {
        let registry = registry();
        let dispatcher = registry.dispatcher();

        assert_eq!(dispatcher.metric_labels("vllm", "attn"), ("vllm", "attn"));
        assert_eq!(dispatcher.metric_labels("vllm", "no_such_op"), ("vllm", "unknown"));
        assert_eq!(dispatcher.metric_labels("junk-ns", "attn"), ("unknown", "unknown"));
    }
}

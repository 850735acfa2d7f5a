//! Implementation units: the callable surface of one collector generation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::args::CallArgs;
use crate::versions::GenerationTag;

/// Error raised by a collector function. Passed through dispatch untouched.
pub type InvocationError = Box<dyn std::error::Error + Send + Sync>;

/// A collector function exposed by an implementation unit.
pub type CollectorFn = Arc<dyn Fn(&CallArgs) -> Result<Value, InvocationError> + Send + Sync>;

/// Identifies the implementation unit for `(namespace, operation, tag)`.
///
/// Displays as `{namespace}/{operation}_{tag}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId {
    namespace: String,
    operation: String,
    tag: GenerationTag,
}

impl UnitId {
    pub fn new(namespace: impl Into<String>, operation: impl Into<String>, tag: GenerationTag) -> Self {
        Self {
            namespace: namespace.into(),
            operation: operation.into(),
            tag,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn tag(&self) -> &GenerationTag {
        &self.tag
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}_{}", self.namespace, self.operation, self.tag)
    }
}

/// Fixed set of named functions for one collector generation.
pub struct CollectorUnit {
    id: UnitId,
    functions: BTreeMap<String, CollectorFn>,
}

impl CollectorUnit {
    pub fn builder(id: UnitId) -> CollectorUnitBuilder {
        CollectorUnitBuilder {
            id,
            functions: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &UnitId {
        &self.id
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn get_function(&self, name: &str) -> Option<&CollectorFn> {
        self.functions.get(name)
    }

    /// Exposed function names, sorted.
    pub fn function_names(&self) -> Vec<String> {
        self.functions.keys().cloned().collect()
    }
}

impl fmt::Debug for CollectorUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectorUnit")
            .field("id", &self.id.to_string())
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

pub struct CollectorUnitBuilder {
    id: UnitId,
    functions: BTreeMap<String, CollectorFn>,
}

impl CollectorUnitBuilder {
    /// Expose `f` under `name`. A later registration of the same name wins.
    pub fn function<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&CallArgs) -> Result<Value, InvocationError> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(f));
        self
    }

    pub fn build(self) -> CollectorUnit {
        CollectorUnit {
            id: self.id,
            functions: self.functions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> CollectorUnit {
        let id = UnitId::new("vllm", "attn", GenerationTag::from("v2"));
        CollectorUnit::builder(id)
            .function("run_attention", |args| Ok(args.keyword("batch_size").cloned().unwrap_or(Value::Null)))
            .function("get_context_attention_test_cases", |_| Ok(Value::Array(vec![])))
            .build()
    }

    #[test]
    fn test_unit_id_format() {
        let id = UnitId::new("trtllm", "moe", GenerationTag::from("v3"));
        assert_eq!(id.to_string(), "trtllm/moe_v3");
    }

    #[test]
    fn test_function_lookup() {
        let unit = unit();
        assert!(unit.has_function("run_attention"));
        assert!(!unit.has_function("run_moe"));

        let f = unit.get_function("run_attention").unwrap();
        let out = f(&CallArgs::new().kwarg("batch_size", 8)).unwrap();
        assert_eq!(out, Value::from(8));
    }

    #[test]
    fn test_function_names_sorted() {
        assert_eq!(
            unit().function_names(),
            vec!["get_context_attention_test_cases", "run_attention"]
        );
    }

    #[test]
    fn test_debug_lists_functions() {
        let text = format!("{:?}", unit());
        assert!(text.contains("vllm/attn_v2"));
        assert!(text.contains("run_attention"));
    }
}

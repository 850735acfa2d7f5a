//! Argument bundle passed through dispatch to collector functions.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArgError {
    #[error("missing argument: {0}")]
    Missing(String),

    #[error("invalid argument {name}: {source}")]
    Invalid {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Positional and keyword arguments for one collector call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallArgs {
    #[serde(default)]
    pub positional: Vec<Value>,
    #[serde(default)]
    pub keyword: Map<String, Value>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set a keyword argument, replacing any previous value.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    pub fn positional(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keyword.get(name)
    }

    /// Decode a keyword argument that must be present.
    pub fn required<T: DeserializeOwned>(&self, name: &str) -> Result<T, ArgError> {
        let value = self
            .keyword(name)
            .ok_or_else(|| ArgError::Missing(name.to_string()))?;
        decode(name, value)
    }

    /// Decode a keyword argument, `None` when absent.
    pub fn optional<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, ArgError> {
        self.keyword(name).map(|v| decode(name, v)).transpose()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

fn decode<T: DeserializeOwned>(name: &str, value: &Value) -> Result<T, ArgError> {
    T::deserialize(value).map_err(|source| ArgError::Invalid {
        name: name.to_string(),
        source,
    })
}

//! Version string -> generation tag resolution.
//!
//! Matching is exact and first-hit in construction order. What happens on a
//! miss is decided by the namespace's [`FallbackPolicy`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::table::{GenerationTag, VersionTable};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Unknown op: {operation}. Supported: {known:?}")]
    UnknownOperation { operation: String, known: Vec<String> },

    #[error("Unsupported version {version} for op {operation}. Supported: {supported:?}")]
    UnsupportedVersion {
        operation: String,
        version: String,
        supported: Vec<String>,
    },
}

/// Which constructed generation serves as "latest" for lenient fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatestTag {
    First,
    Last,
}

/// Behavior when a version matches no generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Fail with [`ResolveError::UnsupportedVersion`].
    Strict,
    /// Resolve to the operation's latest generation, never failing.
    Lenient(LatestTag),
}

impl FallbackPolicy {
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Strict)
    }
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::Lenient(LatestTag::First) => f.write_str("lenient(first)"),
            Self::Lenient(LatestTag::Last) => f.write_str("lenient(last)"),
        }
    }
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub tag: GenerationTag,
    /// False when the tag came from lenient fallback.
    pub exact: bool,
}

/// Pure resolver over one namespace's table.
#[derive(Debug, Clone)]
pub struct VersionResolver {
    table: VersionTable,
    policy: FallbackPolicy,
    fallbacks: HashMap<String, GenerationTag>,
}

impl VersionResolver {
    pub fn new(table: VersionTable, policy: FallbackPolicy) -> Self {
        let fallbacks = match policy {
            FallbackPolicy::Strict => HashMap::new(),
            FallbackPolicy::Lenient(rule) => table
                .operations()
                .map(|op| (op.name().to_string(), op.latest(rule).clone()))
                .collect(),
        };
        Self { table, policy, fallbacks }
    }

    pub fn table(&self) -> &VersionTable {
        &self.table
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Rebuild with another policy over the same table.
    pub fn with_policy(self, policy: FallbackPolicy) -> Self {
        Self::new(self.table, policy)
    }

    /// Fallback tag for `operation`; `None` under strict policy.
    pub fn fallback_tag(&self, operation: &str) -> Option<&GenerationTag> {
        self.fallbacks.get(operation)
    }

    pub fn resolve(&self, operation: &str, version: &str) -> Result<GenerationTag, ResolveError> {
        self.resolve_detailed(operation, version).map(|r| r.tag)
    }

    pub fn resolve_detailed(&self, operation: &str, version: &str) -> Result<Resolution, ResolveError> {
        let entry = self.table.operation(operation)?;

        if let Some(tag) = entry.find(version) {
            return Ok(Resolution { tag: tag.clone(), exact: true });
        }

        match self.policy {
            FallbackPolicy::Strict => Err(ResolveError::UnsupportedVersion {
                operation: operation.to_string(),
                version: version.to_string(),
                supported: entry.versions(),
            }),
            FallbackPolicy::Lenient(rule) => {
                let tag = self
                    .fallbacks
                    .get(operation)
                    .unwrap_or_else(|| entry.latest(rule))
                    .clone();
                Ok(Resolution { tag, exact: false })
            }
        }
    }
}

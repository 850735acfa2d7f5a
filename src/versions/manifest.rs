//! Declarative version table manifests.
//!
//! A manifest describes one namespace: its fallback policy and, per
//! operation, an explicitly ordered list of generations.
//!
//! ```toml
//! namespace = "vllm"
//!
//! [fallback]
//! policy = "lenient"
//! latest = "last"
//!
//! [[operations]]
//! name = "attn"
//! generations = [
//!   { tag = "v1", versions = ["0.11.0", "0.12.0"] },
//!   { tag = "v2", versions = ["0.15.0", "0.15.1"] },
//! ]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::resolver::{FallbackPolicy, LatestTag, VersionResolver};
use super::table::{TableError, VersionTable};

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid version table for namespace {namespace}: {source}")]
    Table {
        namespace: String,
        #[source]
        source: TableError,
    },
}

/// Version table manifest for one namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableManifest {
    /// Namespace identifier (e.g., "vllm").
    pub namespace: String,
    /// Behavior on version miss. Required so the choice is always explicit.
    pub fallback: FallbackSpec,
    /// Operations in declaration order.
    pub operations: Vec<OperationSpec>,
}

/// Serialized form of [`FallbackPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum FallbackSpec {
    Strict,
    /// `latest` is required: the first/last choice is part of the table.
    Lenient { latest: LatestTag },
}

impl From<FallbackSpec> for FallbackPolicy {
    fn from(spec: FallbackSpec) -> Self {
        match spec {
            FallbackSpec::Strict => FallbackPolicy::Strict,
            FallbackSpec::Lenient { latest } => FallbackPolicy::Lenient(latest),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSpec {
    pub name: String,
    /// Explicit lenient fallback tag; overrides `fallback.latest`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,
    /// Generations, oldest first unless the namespace says otherwise.
    pub generations: Vec<GenerationSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSpec {
    pub tag: String,
    pub versions: Vec<String>,
}

impl TableManifest {
    pub fn from_toml(content: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load every `*.toml` manifest in `dir`, ordered by file name.
    pub fn load_dir(dir: &Path) -> Result<Vec<Self>, ManifestError> {
        let io_err = |source| ManifestError::Io { path: dir.to_path_buf(), source };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            }
        }
        paths.sort();

        paths.iter().map(|p| Self::from_file(p)).collect()
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.fallback.into()
    }

    /// Build and validate the version table.
    pub fn build_table(&self) -> Result<VersionTable, ManifestError> {
        let mut builder = VersionTable::builder();
        for op in &self.operations {
            let generations = op
                .generations
                .iter()
                .map(|g| (g.tag.clone(), g.versions.clone()))
                .collect();
            builder
                .add_operation(op.name.clone(), op.latest.clone(), generations)
                .map_err(|source| ManifestError::Table {
                    namespace: self.namespace.clone(),
                    source,
                })?;
        }
        Ok(builder.build())
    }

    pub fn resolver(&self) -> Result<VersionResolver, ManifestError> {
        Ok(VersionResolver::new(self.build_table()?, self.policy()))
    }
}

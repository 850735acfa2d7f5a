//! Per-operation generation tables.
//!
//! Every operation owns an ordered list of `(tag, versions)` pairs. List order
//! is recency order: it drives first-hit resolution and the choice of the
//! lenient fallback generation.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use thiserror::Error;

use super::resolver::{LatestTag, ResolveError};

/// Label of one implementation generation of an operation ("v1", "v2", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenerationTag(String);

impl GenerationTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GenerationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GenerationTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl PartialEq<str> for GenerationTag {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for GenerationTag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Integrity violations detected while building a table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("{0} name cannot be empty")]
    EmptyName(&'static str),

    #[error("Operation declared twice: {0}")]
    DuplicateOperation(String),

    #[error("Operation {0} declares no generations")]
    EmptyOperation(String),

    #[error("Generation {tag} declared twice for operation {operation}")]
    DuplicateTag { operation: String, tag: String },

    #[error("Version {version} of operation {operation} is listed under both {first} and {second}")]
    DuplicateVersion {
        operation: String,
        version: String,
        first: GenerationTag,
        second: GenerationTag,
    },

    #[error("Fallback generation {tag} is not declared for operation {operation}")]
    UnknownFallbackTag { operation: String, tag: String },
}

/// One implementation generation and the exact versions it serves.
#[derive(Debug, Clone)]
pub struct Generation {
    tag: GenerationTag,
    versions: BTreeSet<String>,
}

impl Generation {
    pub fn tag(&self) -> &GenerationTag {
        &self.tag
    }

    /// Versions served by this generation, ascending.
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.versions.iter().map(String::as_str)
    }

    /// Exact string match; versions are never parsed.
    pub fn contains(&self, version: &str) -> bool {
        self.versions.contains(version)
    }
}

/// Ordered generations of a single operation.
#[derive(Debug, Clone)]
pub struct OperationTable {
    name: String,
    // Never empty once built.
    generations: Vec<Generation>,
    pinned_latest: Option<GenerationTag>,
}

impl OperationTable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn generations(&self) -> &[Generation] {
        &self.generations
    }

    /// First generation, in construction order, that lists `version`.
    pub fn find(&self, version: &str) -> Option<&GenerationTag> {
        self.generations
            .iter()
            .find(|g| g.contains(version))
            .map(Generation::tag)
    }

    /// Generation used when a version matches nothing.
    ///
    /// An explicitly pinned tag wins over the positional rule.
    pub fn latest(&self, rule: LatestTag) -> &GenerationTag {
        if let Some(tag) = &self.pinned_latest {
            return tag;
        }
        let idx = match rule {
            LatestTag::First => 0,
            LatestTag::Last => self.generations.len() - 1,
        };
        &self.generations[idx].tag
    }

    pub fn pinned_latest(&self) -> Option<&GenerationTag> {
        self.pinned_latest.as_ref()
    }

    /// Union of all versions, deduplicated and sorted ascending.
    pub fn versions(&self) -> Vec<String> {
        let all: BTreeSet<&String> = self.generations.iter().flat_map(|g| &g.versions).collect();
        all.into_iter().cloned().collect()
    }

    /// Generation tags in construction order.
    pub fn tags(&self) -> Vec<GenerationTag> {
        self.generations.iter().map(|g| g.tag.clone()).collect()
    }
}

/// Mapping operation -> ordered generations for one namespace.
///
/// Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct VersionTable {
    operations: Vec<OperationTable>,
    index: HashMap<String, usize>,
}

impl VersionTable {
    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    pub fn get(&self, operation: &str) -> Option<&OperationTable> {
        self.index.get(operation).map(|&i| &self.operations[i])
    }

    /// Look up an operation, failing with the list of known operations.
    pub fn operation(&self, operation: &str) -> Result<&OperationTable, ResolveError> {
        self.get(operation).ok_or_else(|| ResolveError::UnknownOperation {
            operation: operation.to_string(),
            known: self.all_operations(),
        })
    }

    pub fn versions_for(&self, operation: &str) -> Result<Vec<String>, ResolveError> {
        self.operation(operation).map(OperationTable::versions)
    }

    pub fn tags_for(&self, operation: &str) -> Result<Vec<GenerationTag>, ResolveError> {
        self.operation(operation).map(OperationTable::tags)
    }

    /// Operation names in declaration order.
    pub fn all_operations(&self) -> Vec<String> {
        self.operations.iter().map(|op| op.name.clone()).collect()
    }

    pub fn contains_operation(&self, operation: &str) -> bool {
        self.index.contains_key(operation)
    }

    pub fn operations(&self) -> impl Iterator<Item = &OperationTable> {
        self.operations.iter()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Validating builder for [`VersionTable`].
#[derive(Debug, Default)]
pub struct TableBuilder {
    table: VersionTable,
}

impl TableBuilder {
    /// Add an operation with its generations in recency order.
    pub fn operation<N, I, T, V, S>(mut self, name: N, generations: I) -> Result<Self, TableError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (T, V)>,
        T: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_operation(name.into(), None, collect_generations(generations))?;
        Ok(self)
    }

    /// Like [`operation`](Self::operation), pinning the lenient fallback tag.
    pub fn operation_with_latest<N, L, I, T, V, S>(
        mut self,
        name: N,
        latest: L,
        generations: I,
    ) -> Result<Self, TableError>
    where
        N: Into<String>,
        L: Into<String>,
        I: IntoIterator<Item = (T, V)>,
        T: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_operation(name.into(), Some(latest.into()), collect_generations(generations))?;
        Ok(self)
    }

    /// Validate and append one operation.
    pub fn add_operation(
        &mut self,
        name: String,
        latest: Option<String>,
        generations: Vec<(String, Vec<String>)>,
    ) -> Result<(), TableError> {
        if name.trim().is_empty() {
            return Err(TableError::EmptyName("operation"));
        }
        if self.table.index.contains_key(&name) {
            return Err(TableError::DuplicateOperation(name));
        }
        if generations.is_empty() {
            return Err(TableError::EmptyOperation(name));
        }

        let mut owner: HashMap<String, GenerationTag> = HashMap::new();
        let mut built: Vec<Generation> = Vec::with_capacity(generations.len());

        for (tag, versions) in generations {
            if tag.trim().is_empty() {
                return Err(TableError::EmptyName("generation"));
            }
            if built.iter().any(|g| g.tag == tag.as_str()) {
                return Err(TableError::DuplicateTag { operation: name, tag });
            }
            let tag = GenerationTag::new(tag);
            let mut set = BTreeSet::new();
            for version in versions {
                if version.trim().is_empty() {
                    return Err(TableError::EmptyName("version"));
                }
                match owner.get(&version) {
                    Some(first) if *first != tag => {
                        return Err(TableError::DuplicateVersion {
                            operation: name,
                            version,
                            first: first.clone(),
                            second: tag,
                        });
                    }
                    Some(_) => {}
                    None => {
                        owner.insert(version.clone(), tag.clone());
                    }
                }
                set.insert(version);
            }
            built.push(Generation { tag, versions: set });
        }

        let pinned_latest = match latest {
            Some(tag) if built.iter().any(|g| g.tag == tag.as_str()) => Some(GenerationTag::new(tag)),
            Some(tag) => return Err(TableError::UnknownFallbackTag { operation: name, tag }),
            None => None,
        };

        self.table.index.insert(name.clone(), self.table.operations.len());
        self.table.operations.push(OperationTable {
            name,
            generations: built,
            pinned_latest,
        });
        Ok(())
    }

    pub fn build(self) -> VersionTable {
        self.table
    }
}

fn collect_generations<I, T, V, S>(generations: I) -> Vec<(String, Vec<String>)>
where
    I: IntoIterator<Item = (T, V)>,
    T: Into<String>,
    V: IntoIterator<Item = S>,
    S: Into<String>,
{
    generations
        .into_iter()
        .map(|(tag, versions)| (tag.into(), versions.into_iter().map(Into::into).collect()))
        .collect()
}

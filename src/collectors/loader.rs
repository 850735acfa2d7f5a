//! Implementation loaders.
//!
//! The dispatcher only sees [`ImplementationLoader`]. [`StaticLoader`] serves
//! units registered up front; [`CachingLoader`] memoizes an expensive loader
//! so each unit is loaded once, even under concurrent first requests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::debug;

use super::unit::{CollectorUnit, UnitId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Implementation unit not found: {0}")]
    NotFound(UnitId),

    #[error("Failed to load implementation unit {unit}: {reason}")]
    Failed { unit: UnitId, reason: String },
}

/// Source of implementation units for one namespace.
#[async_trait]
pub trait ImplementationLoader: Send + Sync {
    async fn load(&self, unit: &UnitId) -> Result<Arc<CollectorUnit>, LoadError>;
}

/// Loader over a fixed set of units built at startup.
#[derive(Debug, Default)]
pub struct StaticLoader {
    units: HashMap<UnitId, Arc<CollectorUnit>>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(mut self, unit: CollectorUnit) -> Self {
        self.insert(unit);
        self
    }

    /// Add a unit, returning the one it replaced.
    pub fn insert(&mut self, unit: CollectorUnit) -> Option<Arc<CollectorUnit>> {
        self.units.insert(unit.id().clone(), Arc::new(unit))
    }

    pub fn contains(&self, unit: &UnitId) -> bool {
        self.units.contains_key(unit)
    }

    /// Registered unit ids, sorted.
    pub fn unit_ids(&self) -> Vec<UnitId> {
        let mut ids: Vec<UnitId> = self.units.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[async_trait]
impl ImplementationLoader for StaticLoader {
    async fn load(&self, unit: &UnitId) -> Result<Arc<CollectorUnit>, LoadError> {
        self.units
            .get(unit)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(unit.clone()))
    }
}

/// Memoizing wrapper: the inner loader runs at most once per successful unit.
///
/// Failed loads are not cached; the next request retries the inner loader.
pub struct CachingLoader<L> {
    inner: L,
    cells: DashMap<UnitId, Arc<OnceCell<Arc<CollectorUnit>>>>,
}

impl<L: ImplementationLoader> CachingLoader<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            cells: DashMap::new(),
        }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// Number of units currently held in the cache.
    pub fn cached_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.value().initialized()).count()
    }
}

#[async_trait]
impl<L: ImplementationLoader> ImplementationLoader for CachingLoader<L> {
    async fn load(&self, unit: &UnitId) -> Result<Arc<CollectorUnit>, LoadError> {
        // Clone the cell out so no shard lock is held across the await.
        let cell = self.cells.entry(unit.clone()).or_default().value().clone();

        let loaded = cell
            .get_or_try_init(|| async {
                debug!(unit = %unit, "loading implementation unit");
                self.inner.load(unit).await
            })
            .await?;
        Ok(Arc::clone(loaded))
    }
}

use async_trait::async_trait;
use quiz_core::model::{ItemId, ItemIdError, RegionTag};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::directory::DirectoryCatalog;
use crate::sample;

/// Errors surfaced by catalog providers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    /// The backing source could not be read (missing directory, I/O failure,
    /// poisoned lock).
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    #[error("region not found: {0}")]
    RegionNotFound(RegionTag),

    #[error(transparent)]
    Malformed(#[from] ItemIdError),
}

/// Source of quiz items, grouped by region.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// List every region this provider knows about.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the source cannot be read.
    async fn list_regions(&self) -> Result<Vec<RegionTag>, ProviderError>;

    /// List identifiers for one region, in the provider's order.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::RegionNotFound` for unknown regions, or
    /// `ProviderError::Unavailable` if the source cannot be read.
    async fn list_identifiers(&self, region: &RegionTag) -> Result<Vec<ItemId>, ProviderError>;
}

/// Simple in-memory catalog for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    regions: Arc<Mutex<BTreeMap<RegionTag, Vec<ItemId>>>>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from `(region, names)` pairs. Names are item names
    /// without the region prefix.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Malformed` if a region or name is invalid.
    pub fn from_regions<'a>(
        regions: impl IntoIterator<Item = (&'a str, &'a [&'a str])>,
    ) -> Result<Self, ProviderError> {
        let catalog = Self::new();
        for (region, names) in regions {
            let region = RegionTag::new(region)?;
            let items = names
                .iter()
                .map(|name| ItemId::new(format!("{region}-{name}")))
                .collect::<Result<Vec<_>, _>>()?;
            catalog.replace_region(region, items)?;
        }
        Ok(catalog)
    }

    /// Insert or replace every item of a region.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the lock is poisoned.
    pub fn replace_region(&self, region: RegionTag, items: Vec<ItemId>) -> Result<(), ProviderError> {
        let mut guard = self
            .regions
            .lock()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        guard.insert(region, items);
        Ok(())
    }

    /// Drop a region and its items. Returns true if it existed.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the lock is poisoned.
    pub fn remove_region(&self, region: &RegionTag) -> Result<bool, ProviderError> {
        let mut guard = self
            .regions
            .lock()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        Ok(guard.remove(region).is_some())
    }
}

#[async_trait]
impl CatalogProvider for InMemoryCatalog {
    async fn list_regions(&self) -> Result<Vec<RegionTag>, ProviderError> {
        let guard = self
            .regions
            .lock()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        Ok(guard.keys().cloned().collect())
    }

    async fn list_identifiers(&self, region: &RegionTag) -> Result<Vec<ItemId>, ProviderError> {
        let guard = self
            .regions
            .lock()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        guard
            .get(region)
            .cloned()
            .ok_or_else(|| ProviderError::RegionNotFound(region.clone()))
    }
}

/// Holds the configured catalog provider behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub catalog: Arc<dyn CatalogProvider>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(catalog: InMemoryCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// Built-in world catalog, used when no asset directory is configured.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Malformed` if the bundled names fail validation.
    pub fn sample() -> Result<Self, ProviderError> {
        Ok(Self::in_memory(sample::world_catalog()?))
    }

    #[must_use]
    pub fn directory(catalog: DirectoryCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}
